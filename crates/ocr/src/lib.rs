//! OCR 引擎接入与输出归一化
//!
//! - `OcrEngine`：引擎统一 trait，当前实现为 Tesseract CLI
//! - `parse`：把 hOCR / JSON / TSV 输出展开为单词级结果

mod engine;
mod error;
pub mod parse;
mod tesseract;
mod types;

pub use engine::OcrEngine;
pub use error::{OcrError, Result};
pub use parse::{detect_format, page_size, parse_auto, parse_output, parse_str};
pub use tesseract::{
    compute_tessdata_hash, detect_tesseract_status, get_tesseract_langs, get_tesseract_version,
    TesseractEngine,
};
pub use types::*;
