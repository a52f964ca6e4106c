//! OCR 输出归一化
//!
//! 不同引擎的原生输出形状不同，这里统一展开成单词列表 `Vec<OcrWord>`。

mod hocr;
mod json;
mod tsv;

pub use hocr::{hocr_page_size, parse_hocr};
pub use json::parse_json;
pub use tsv::{parse_tsv, tsv_page_size};

use crate::error::{OcrError, Result};
use crate::types::{OcrOutput, OcrOutputFormat, OcrWord};

/// 根据内容猜测输出格式
pub fn detect_format(body: &str) -> Option<OcrOutputFormat> {
    let trimmed = body.trim_start_matches('\u{feff}').trim_start();

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(OcrOutputFormat::Json);
    }
    if trimmed.starts_with('<') || trimmed.contains("ocrx_word") {
        return Some(OcrOutputFormat::Hocr);
    }
    if trimmed.starts_with("level\t") {
        return Some(OcrOutputFormat::Tsv);
    }
    None
}

/// 按指定格式解析
pub fn parse_str(body: &str, format: OcrOutputFormat) -> Result<Vec<OcrWord>> {
    let words = match format {
        OcrOutputFormat::Hocr => parse_hocr(body),
        OcrOutputFormat::Json => parse_json(body)?,
        OcrOutputFormat::Tsv => parse_tsv(body),
    };
    log::debug!("[Parse] {} 输出解析出 {} 个单词", format, words.len());
    Ok(words)
}

/// 自动识别格式并解析
pub fn parse_auto(body: &str) -> Result<Vec<OcrWord>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let format = detect_format(body).ok_or(OcrError::UnknownFormat)?;
    parse_str(body, format)
}

/// 从输出本身读取页面尺寸（JSON 输出不带尺寸信息）
pub fn page_size(body: &str, format: OcrOutputFormat) -> Option<(u32, u32)> {
    match format {
        OcrOutputFormat::Hocr => hocr_page_size(body),
        OcrOutputFormat::Tsv => tsv_page_size(body),
        OcrOutputFormat::Json => None,
    }
}

/// 解析引擎输出
pub fn parse_output(output: &OcrOutput) -> Result<Vec<OcrWord>> {
    parse_str(&output.body, output.format)
}
