//! OCR 错误类型

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("引擎不可用: {0}")]
    EngineUnavailable(String),

    #[error("引擎执行失败: {0}")]
    EngineFailed(String),

    #[error("图像处理失败: {0}")]
    ImageProcess(String),

    #[error("无法识别的 OCR 输出格式")]
    UnknownFormat,

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;
