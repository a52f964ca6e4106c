use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use linch_core::{HighlightOptions, MatchMode};
use linch_ocr::TesseractConfig;
use linch_render::OverlayStyle;

/// 配置文件路径环境变量
pub const CONFIG_ENV: &str = "LINCH_HIGHLIGHT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "linch-highlight.json";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    // ============ OCR 配置 ============
    /// Tesseract 配置
    pub tesseract: TesseractConfig,

    // ============ 匹配配置 ============
    /// 默认关键词（命令行未指定时使用）
    pub keywords: Vec<String>,
    /// 匹配模式
    pub match_mode: MatchMode,
    /// 最低置信度 (0-100)
    pub min_confidence: Option<f32>,

    // ============ 绘制配置 ============
    pub overlay: OverlayStyle,
}

impl AppConfig {
    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            mode: self.match_mode,
            min_confidence: self.min_confidence,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 解析配置文件路径：命令行参数 > 环境变量 > 当前目录
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// 读取配置，文件不存在时返回默认值
pub fn load_config(path: &Path) -> ConfigResult<AppConfig> {
    if !path.exists() {
        log::debug!("[Config] {} 不存在，使用默认配置", path.display());
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    let config = serde_json::from_str(&raw)?;
    log::info!("[Config] 已加载 {}", path.display());
    Ok(config)
}

pub fn save_config(path: &Path, config: &AppConfig) -> ConfigResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw)?;
    log::info!("[Config] 已保存 {}", path.display());
    Ok(())
}
