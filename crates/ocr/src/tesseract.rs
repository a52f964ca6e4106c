//! Tesseract OCR 引擎实现（CLI 包装）

use image::{DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use crate::engine::OcrEngine;
use crate::error::{OcrError, Result};
use crate::types::{OcrAuditInfo, OcrOutput, TesseractConfig, TesseractStatus};

/// Tesseract OCR 引擎
pub struct TesseractEngine {
    config: TesseractConfig,
    version: Option<String>,
}

impl TesseractEngine {
    /// 创建 Tesseract 引擎，会先检查 binary 是否可用
    pub fn new(config: TesseractConfig) -> Result<Self> {
        let version = get_tesseract_version(config.binary_or_default())?;

        log::info!("[Tesseract] 初始化成功，版本: {}", version);

        Ok(Self {
            config,
            version: Some(version),
        })
    }

    /// 构建识别命令
    fn command(&self, image_path: &Path) -> Command {
        let mut cmd = Command::new(self.config.binary_or_default());

        cmd.arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(self.config.lang_or_default())
            .arg("--psm")
            .arg(self.config.psm_or_default().to_string())
            .arg("--oem")
            .arg(self.config.oem_or_default().to_string())
            .arg(self.config.format_or_default().to_string());

        if let Some(tessdata_path) = &self.config.tessdata_path {
            cmd.env("TESSDATA_PREFIX", tessdata_path);
        }

        cmd
    }

    fn run(&self, image_path: &Path) -> Result<String> {
        log::info!(
            "[Tesseract] 执行: {} {} -l {} --psm {} --oem {} {}",
            self.config.binary_or_default(),
            image_path.display(),
            self.config.lang_or_default(),
            self.config.psm_or_default(),
            self.config.oem_or_default(),
            self.config.format_or_default()
        );

        let output = self
            .command(image_path)
            .output()
            .map_err(|e| OcrError::EngineFailed(format!("执行 tesseract 失败: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::EngineFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize_image(&mut self, img: &DynamicImage) -> Result<OcrOutput> {
        let tmp = tempfile::Builder::new()
            .prefix("linch-ocr-")
            .suffix(".png")
            .tempfile()?;

        img.save_with_format(tmp.path(), ImageFormat::Png)
            .map_err(|e| OcrError::ImageProcess(format!("保存临时图片失败: {}", e)))?;

        // tmp 离开作用域时自动删除
        self.recognize_file(tmp.path())
    }

    fn recognize_file(&mut self, image_path: &Path) -> Result<OcrOutput> {
        let start = Instant::now();

        let (image_width, image_height) = image::image_dimensions(image_path)
            .map_err(|e| OcrError::ImageProcess(format!("读取图片失败: {}", e)))?;

        let body = self.run(image_path)?;

        log::info!(
            "[Tesseract] 识别完成，耗时: {} ms，输出 {} 字节",
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(OcrOutput {
            format: self.config.format_or_default(),
            body,
            image_width,
            image_height,
        })
    }

    fn audit_info(&self) -> OcrAuditInfo {
        let params = serde_json::json!({
            "lang": self.config.lang_or_default(),
            "psm": self.config.psm_or_default(),
            "oem": self.config.oem_or_default(),
            "format": self.config.format_or_default(),
        });

        OcrAuditInfo {
            engine: "tesseract".to_string(),
            engine_version: self.version.clone(),
            engine_params: Some(params.to_string()),
            tessdata_hash: self
                .config
                .tessdata_path
                .as_deref()
                .and_then(|p| compute_tessdata_hash(Path::new(p)).ok()),
        }
    }
}

/// 获取 Tesseract 版本
pub fn get_tesseract_version(binary_path: &str) -> Result<String> {
    let output = Command::new(binary_path)
        .arg("--version")
        .output()
        .map_err(|e| OcrError::EngineUnavailable(format!("无法执行 {}: {}", binary_path, e)))?;

    if !output.status.success() {
        return Err(OcrError::EngineUnavailable(
            "tesseract --version 执行失败".to_string(),
        ));
    }

    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(parse_version(&combined).unwrap_or_else(|| "unknown".to_string()))
}

/// 格式通常是 "tesseract 5.3.0" 或 "tesseract v5.3.0"
fn parse_version(text: &str) -> Option<String> {
    text.lines()
        .filter(|line| line.contains("tesseract"))
        .find_map(|line| {
            line.split_whitespace()
                .nth(1)
                .map(|v| v.trim_start_matches('v').to_string())
        })
}

/// 获取 Tesseract 可用语言列表
pub fn get_tesseract_langs(binary_path: &str, tessdata_path: Option<&str>) -> Result<Vec<String>> {
    let mut cmd = Command::new(binary_path);
    cmd.arg("--list-langs");

    if let Some(path) = tessdata_path {
        cmd.env("TESSDATA_PREFIX", path);
    }

    let output = cmd
        .output()
        .map_err(|e| OcrError::EngineUnavailable(format!("执行失败: {}", e)))?;

    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(parse_langs(&combined))
}

fn parse_langs(text: &str) -> Vec<String> {
    let mut langs = Vec::new();
    let mut found_list = false;

    for line in text.lines() {
        let line = line.trim();
        if line.contains("List of available languages") {
            found_list = true;
            continue;
        }
        if found_list && !line.is_empty() && !line.contains(':') {
            langs.push(line.to_string());
        }
    }

    langs
}

/// 检测 Tesseract 安装状态
pub fn detect_tesseract_status(config: &TesseractConfig) -> TesseractStatus {
    let binary_path = config.binary_or_default();

    match get_tesseract_version(binary_path) {
        Ok(version) => {
            let langs = get_tesseract_langs(binary_path, config.tessdata_path.as_deref())
                .unwrap_or_default();
            let tessdata = config
                .tessdata_path
                .clone()
                .or_else(|| find_tessdata_path().map(|p| p.to_string_lossy().into_owned()));

            TesseractStatus {
                installed: true,
                version: Some(version),
                binary_path: which_tesseract(binary_path).or_else(|| Some(binary_path.to_string())),
                tessdata_path: tessdata,
                available_langs: langs,
                error: None,
            }
        }
        Err(e) => {
            log::warn!("[Tesseract] 未检测到可用的 tesseract: {}", e);
            TesseractStatus {
                installed: false,
                version: None,
                binary_path: None,
                tessdata_path: None,
                available_langs: Vec::new(),
                error: Some("无法检测到 Tesseract，请确认已安装并正确配置".to_string()),
            }
        }
    }
}

/// 查找 tesseract 可执行文件的完整路径
fn which_tesseract(binary: &str) -> Option<String> {
    #[cfg(target_os = "windows")]
    let finder = "where";
    #[cfg(not(target_os = "windows"))]
    let finder = "which";

    Command::new(finder)
        .arg(binary)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| {
            String::from_utf8_lossy(&o.stdout)
                .lines()
                .next()
                .map(|line| line.trim().to_string())
        })
        .filter(|s| !s.is_empty())
}

/// 查找 tessdata 路径
fn find_tessdata_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("TESSDATA_PREFIX").map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
    }

    #[cfg(target_os = "windows")]
    let common_paths: Vec<PathBuf> = ["ProgramFiles", "ProgramFiles(x86)"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .map(|base| PathBuf::from(base).join("Tesseract-OCR").join("tessdata"))
        .collect();

    #[cfg(not(target_os = "windows"))]
    let common_paths: Vec<PathBuf> = [
        "/usr/share/tesseract-ocr/5/tessdata",
        "/usr/share/tesseract-ocr/4.00/tessdata",
        "/usr/share/tessdata",
        "/usr/local/share/tessdata",
        "/opt/homebrew/share/tessdata",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect();

    common_paths.into_iter().find(|p| p.exists())
}

/// tessdata 目录指纹（用于审计）
///
/// 对所有 `.traineddata` 的文件名和大小做 SHA-256，文件名排序后计算。
pub fn compute_tessdata_hash(tessdata_path: &Path) -> Result<String> {
    let mut entries: Vec<(String, u64)> = std::fs::read_dir(tessdata_path)?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "traineddata")
                .unwrap_or(false)
        })
        .map(|e| {
            let size = e.metadata().map(|m| m.len()).unwrap_or(0);
            (e.file_name().to_string_lossy().into_owned(), size)
        })
        .collect();
    entries.sort();

    let mut hasher = Sha256::new();
    for (name, size) in entries {
        hasher.update(name.as_bytes());
        hasher.update(size.to_le_bytes());
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OcrOutputFormat;

    #[test]
    fn test_parse_version() {
        let text = "tesseract 5.3.0\n leptonica-1.82.0\n";
        assert_eq!(parse_version(text).as_deref(), Some("5.3.0"));
        assert_eq!(parse_version("tesseract v4.1.1").as_deref(), Some("4.1.1"));
        assert_eq!(parse_version("nothing here"), None);
    }

    #[test]
    fn test_parse_langs() {
        let text = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\nchi_sim\n";
        assert_eq!(parse_langs(text), vec!["eng", "osd", "chi_sim"]);
    }

    #[test]
    fn test_command_arguments() {
        let engine = TesseractEngine {
            config: TesseractConfig {
                lang: Some("deu".to_string()),
                psm: Some(11),
                format: Some(OcrOutputFormat::Tsv),
                ..Default::default()
            },
            version: None,
        };
        let cmd = engine.command(Path::new("page.png"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["page.png", "stdout", "-l", "deu", "--psm", "11", "--oem", "1", "tsv"]
        );
    }

    #[test]
    fn test_tessdata_hash_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("eng.traineddata"), b"abc").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let first = compute_tessdata_hash(dir.path()).unwrap();
        std::fs::write(dir.path().join("other.txt"), b"still ignored").unwrap();
        let second = compute_tessdata_hash(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        std::fs::write(dir.path().join("deu.traineddata"), b"x").unwrap();
        assert_ne!(compute_tessdata_hash(dir.path()).unwrap(), first);
    }

    #[test]
    #[ignore = "需要本机安装 tesseract"]
    fn test_recognize_blank_image() {
        let mut engine = TesseractEngine::new(TesseractConfig::default()).unwrap();
        let img = DynamicImage::new_rgb8(200, 80);
        let output = engine.recognize_image(&img).unwrap();
        assert_eq!((output.image_width, output.image_height), (200, 80));
        assert!(crate::parse::parse_output(&output).unwrap().is_empty());
    }
}
