//! 图片输入：文件路径或 data URL

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("data URL 格式错误: {0}")]
    MalformedDataUrl(&'static str),
    #[error("base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("图片解码失败: {0}")]
    Image(#[from] image::ImageError),
}

/// 解析后的 data URL
#[derive(Debug)]
pub struct DataUrl {
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// 解析 `data:<mime>;base64,<payload>`
pub fn parse_data_url(url: &str) -> Result<DataUrl, InputError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(InputError::MalformedDataUrl("缺少 data: 前缀"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(InputError::MalformedDataUrl("缺少逗号分隔符"))?;

    let mut parts = header.split(';');
    let mime = parts
        .next()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| m.to_ascii_lowercase());
    if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(InputError::MalformedDataUrl("只支持 base64 编码"));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;

    Ok(DataUrl { mime, bytes })
}

fn image_format_from_mime(mime: &str) -> Option<ImageFormat> {
    match mime {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/gif" => Some(ImageFormat::Gif),
        "image/webp" => Some(ImageFormat::WebP),
        "image/bmp" => Some(ImageFormat::Bmp),
        "image/tiff" => Some(ImageFormat::Tiff),
        _ => None,
    }
}

/// 加载图片，支持文件路径和 data URL
pub fn load_image(source: &str) -> Result<DynamicImage, InputError> {
    if source.trim_start().starts_with("data:") {
        let data = parse_data_url(source)?;
        let img = match data.mime.as_deref().and_then(image_format_from_mime) {
            Some(format) => image::load_from_memory_with_format(&data.bytes, format)?,
            None => image::load_from_memory(&data.bytes)?,
        };
        log::info!("[Input] 从 data URL 加载图片 {}x{}", img.width(), img.height());
        return Ok(img);
    }

    let img = image::open(Path::new(source))?;
    log::info!("[Input] 加载图片 {} ({}x{})", source, img.width(), img.height());
    Ok(img)
}
