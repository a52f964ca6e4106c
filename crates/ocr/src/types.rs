//! OCR 共享类型定义

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 边界框（图片像素坐标，左上角 (x0, y0)，右下角 (x1, y1)）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// 创建边界框，自动纠正角点顺序
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// 从左上角和宽高创建
    pub fn from_xywh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// 面积为零或坐标非法
    pub fn is_degenerate(&self) -> bool {
        let finite = [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// 单词级识别结果（统一格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    /// 置信度 0-100，部分输出格式不提供
    pub confidence: Option<f32>,
    pub bbox: BBox,
}

/// OCR 引擎原始输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OcrOutputFormat {
    /// hOCR（HTML，bbox 写在 title 属性中）
    #[default]
    Hocr,
    /// JSON：blocks/paragraphs/lines/words 树，或扁平 words 列表
    Json,
    /// Tesseract TSV
    Tsv,
}

impl std::fmt::Display for OcrOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OcrOutputFormat::Hocr => write!(f, "hocr"),
            OcrOutputFormat::Json => write!(f, "json"),
            OcrOutputFormat::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for OcrOutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hocr" | "html" => Ok(OcrOutputFormat::Hocr),
            "json" => Ok(OcrOutputFormat::Json),
            "tsv" => Ok(OcrOutputFormat::Tsv),
            other => Err(format!("不支持的 OCR 输出格式: {}", other)),
        }
    }
}

/// 引擎原始输出，附带引擎看到的原始图片尺寸
#[derive(Debug, Clone)]
pub struct OcrOutput {
    pub format: OcrOutputFormat,
    pub body: String,
    pub image_width: u32,
    pub image_height: u32,
}

/// Tesseract 配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TesseractConfig {
    /// Tesseract 可执行文件路径
    pub binary_path: Option<String>,
    /// tessdata 目录路径
    pub tessdata_path: Option<String>,
    /// 语言（固定 locale，默认 "eng"）
    pub lang: Option<String>,
    /// 页面分割模式 (0-13)
    pub psm: Option<u8>,
    /// OCR 引擎模式 (0-3)
    pub oem: Option<u8>,
    /// 输出格式（hocr / tsv）
    pub format: Option<OcrOutputFormat>,
}

impl TesseractConfig {
    pub fn binary_or_default(&self) -> &str {
        self.binary_path.as_deref().unwrap_or("tesseract")
    }

    pub fn lang_or_default(&self) -> &str {
        self.lang.as_deref().unwrap_or("eng")
    }

    pub fn psm_or_default(&self) -> u8 {
        self.psm.unwrap_or(3)
    }

    pub fn oem_or_default(&self) -> u8 {
        self.oem.unwrap_or(1)
    }

    /// Tesseract CLI 不能直接输出 JSON，此时回退到 hOCR
    pub fn format_or_default(&self) -> OcrOutputFormat {
        match self.format.unwrap_or_default() {
            OcrOutputFormat::Json => OcrOutputFormat::Hocr,
            other => other,
        }
    }
}

/// Tesseract 安装状态
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TesseractStatus {
    /// 是否已安装
    pub installed: bool,
    /// 版本信息
    pub version: Option<String>,
    /// 可执行文件路径
    pub binary_path: Option<String>,
    /// tessdata 路径
    pub tessdata_path: Option<String>,
    /// 可用语言列表
    pub available_langs: Vec<String>,
    /// 错误信息
    pub error: Option<String>,
}

/// OCR 审计信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrAuditInfo {
    /// 引擎名称
    pub engine: String,
    /// 引擎版本
    pub engine_version: Option<String>,
    /// 引擎参数（JSON）
    pub engine_params: Option<String>,
    /// tessdata 指纹
    pub tessdata_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_normalizes_corners() {
        let bbox = BBox::new(50.0, 40.0, 10.0, 20.0);
        assert_eq!(bbox, BBox::new(10.0, 20.0, 50.0, 40.0));
        assert_eq!(bbox.width(), 40.0);
        assert_eq!(bbox.height(), 20.0);
    }

    #[test]
    fn test_bbox_degenerate() {
        assert!(BBox::from_xywh(10.0, 10.0, 0.0, 5.0).is_degenerate());
        assert!(BBox::new(f32::NAN, 0.0, 1.0, 1.0).is_degenerate());
        assert!(!BBox::from_xywh(10.0, 10.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_config_defaults() {
        let config = TesseractConfig::default();
        assert_eq!(config.binary_or_default(), "tesseract");
        assert_eq!(config.lang_or_default(), "eng");
        assert_eq!(config.psm_or_default(), 3);
        assert_eq!(config.format_or_default(), OcrOutputFormat::Hocr);

        let json = TesseractConfig {
            format: Some(OcrOutputFormat::Json),
            ..Default::default()
        };
        assert_eq!(json.format_or_default(), OcrOutputFormat::Hocr);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("HOCR".parse::<OcrOutputFormat>(), Ok(OcrOutputFormat::Hocr));
        assert_eq!("tsv".parse::<OcrOutputFormat>(), Ok(OcrOutputFormat::Tsv));
        assert!("alto".parse::<OcrOutputFormat>().is_err());
    }
}
