//! OCR 引擎 trait 定义

use crate::error::{OcrError, Result};
use crate::parse::parse_output;
use crate::types::{OcrAuditInfo, OcrOutput, OcrWord};
use image::DynamicImage;
use std::path::Path;

/// OCR 引擎统一 trait
///
/// 引擎本身是黑盒：输入图片，输出原始格式（hOCR / JSON / TSV）。
/// 单词提取统一交给 [`parse_output`]。
pub trait OcrEngine: Send {
    /// 识别图片，返回引擎原始输出
    fn recognize_image(&mut self, img: &DynamicImage) -> Result<OcrOutput>;

    /// 识别图片文件
    fn recognize_file(&mut self, image_path: &Path) -> Result<OcrOutput> {
        let img = image::open(image_path)
            .map_err(|e| OcrError::ImageProcess(format!("打开图片失败: {}", e)))?;
        self.recognize_image(&img)
    }

    /// 识别并提取单词级结果
    fn recognize_words(&mut self, img: &DynamicImage) -> Result<Vec<OcrWord>> {
        let output = self.recognize_image(img)?;
        parse_output(&output)
    }

    /// 获取审计信息
    fn audit_info(&self) -> OcrAuditInfo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OcrOutputFormat;

    /// 返回固定 hOCR 的假引擎
    struct FixedEngine;

    impl OcrEngine for FixedEngine {
        fn recognize_image(&mut self, img: &DynamicImage) -> Result<OcrOutput> {
            Ok(OcrOutput {
                format: OcrOutputFormat::Hocr,
                body: r#"<span class='ocrx_word' title='bbox 1 2 30 12; x_wconf 90'>Invoice</span>"#
                    .to_string(),
                image_width: img.width(),
                image_height: img.height(),
            })
        }

        fn audit_info(&self) -> OcrAuditInfo {
            OcrAuditInfo {
                engine: "fixed".to_string(),
                engine_version: None,
                engine_params: None,
                tessdata_hash: None,
            }
        }
    }

    #[test]
    fn test_recognize_words_uses_parser() {
        let img = DynamicImage::new_rgb8(40, 20);
        let words = FixedEngine.recognize_words(&img).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Invoice");
        assert_eq!(words[0].confidence, Some(90.0));
    }
}
