//! 子命令实现

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

use linch_core::{
    highlight_output, highlight_words, DisplaySize, HighlightOptions, HighlightReport, KeywordSet,
    MatchMode,
};
use linch_ocr::{
    detect_format, detect_tesseract_status, page_size, parse_str, OcrEngine, OcrOutputFormat,
    TesseractEngine,
};
use linch_render::{draw_highlights, resize_to_display};

use crate::config::{save_config, AppConfig};
use crate::input::load_image;

/// 关键词与显示尺寸参数，`scan` 和 `parse` 共用
#[derive(Args, Debug, Default)]
pub struct MatchArgs {
    /// 关键词，逗号分隔，可重复指定；不指定时使用配置文件中的关键词
    #[arg(short, long)]
    pub keywords: Vec<String>,

    /// 匹配模式：substring 或 exact
    #[arg(long)]
    pub mode: Option<MatchMode>,

    /// 低于该置信度的单词不参与匹配
    #[arg(long)]
    pub min_confidence: Option<f32>,

    /// 显示宽度（只给一边时按比例推算另一边）
    #[arg(long)]
    pub display_width: Option<f32>,

    /// 显示高度
    #[arg(long)]
    pub display_height: Option<f32>,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// 图片路径或 data URL
    pub image: String,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// 叠加高亮框后的 PNG 输出路径
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON 报告输出路径，默认打印到标准输出
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// 已保存的 OCR 输出文件（hOCR / JSON / TSV）
    pub file: PathBuf,

    /// 输出格式，不指定时按内容识别
    #[arg(long)]
    pub format: Option<OcrOutputFormat>,

    /// 原图宽度
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// 原图高度
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// 原图（用于读取尺寸或绘制叠加层）
    #[arg(long)]
    pub image: Option<String>,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// 叠加高亮框后的 PNG 输出路径
    #[arg(short, long, requires = "image")]
    pub output: Option<PathBuf>,

    /// JSON 报告输出路径，默认打印到标准输出
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
    /// 打印当前生效的配置
    Show,
}

/// 命令行关键词优先，否则回落到配置文件
fn keyword_set(args: &MatchArgs, config: &AppConfig) -> KeywordSet {
    let keywords = if args.keywords.is_empty() {
        KeywordSet::new(&config.keywords)
    } else {
        KeywordSet::parse(&args.keywords.join(","))
    };
    if keywords.is_empty() {
        log::warn!("[CLI] 没有关键词，不会产生任何高亮");
    }
    keywords
}

fn highlight_options(args: &MatchArgs, config: &AppConfig) -> HighlightOptions {
    let defaults = config.highlight_options();
    HighlightOptions {
        mode: args.mode.unwrap_or(defaults.mode),
        min_confidence: args.min_confidence.or(defaults.min_confidence),
    }
}

/// 根据命令行参数得到显示尺寸；只给一边时保持原图宽高比
fn resolve_display(
    natural: (u32, u32),
    width: Option<f32>,
    height: Option<f32>,
) -> Option<DisplaySize> {
    let (natural_w, natural_h) = (natural.0 as f32, natural.1 as f32);
    match (width, height) {
        (Some(width), Some(height)) => Some(DisplaySize { width, height }),
        (Some(width), None) => Some(DisplaySize {
            width,
            height: width * natural_h / natural_w,
        }),
        (None, Some(height)) => Some(DisplaySize {
            width: height * natural_w / natural_h,
            height,
        }),
        (None, None) => None,
    }
}

fn write_report(report: &HighlightReport, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("无法写入报告 {}", path.display()))?;
            log::info!("[CLI] 报告已写入 {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// 在显示尺寸的图片上绘制高亮并保存
fn write_overlay(
    img: &DynamicImage,
    report: &HighlightReport,
    config: &AppConfig,
    path: &Path,
) -> Result<()> {
    let mut canvas = resize_to_display(img, report.display_width, report.display_height)?;
    let boxes: Vec<_> = report.highlights.iter().map(|h| h.bbox).collect();
    let drawn = draw_highlights(&mut canvas, &boxes, &config.overlay);

    canvas
        .save(path)
        .with_context(|| format!("无法保存图片 {}", path.display()))?;
    log::info!("[CLI] 已绘制 {} 个高亮框 -> {}", drawn, path.display());
    Ok(())
}

pub fn run_scan(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let keywords = keyword_set(&args.matching, config);
    let options = highlight_options(&args.matching, config);

    let img = load_image(&args.image).context("无法加载图片")?;
    let mut engine =
        TesseractEngine::new(config.tesseract.clone()).context("Tesseract 不可用，请先安装")?;
    log::debug!("[CLI] 引擎信息: {:?}", engine.audit_info());

    let output = engine.recognize_image(&img).context("OCR 识别失败")?;
    let display = resolve_display(
        (output.image_width, output.image_height),
        args.matching.display_width,
        args.matching.display_height,
    );
    let report = highlight_output(&output, display, &keywords, &options)?;
    log::info!(
        "[CLI] {} 个单词中命中 {} 个",
        report.word_count,
        report.highlights.len()
    );

    if let Some(path) = &args.output {
        write_overlay(&img, &report, config, path)?;
    }

    write_report(&report, args.report.as_deref())
}

pub fn run_parse(args: ParseArgs, config: &AppConfig) -> Result<()> {
    let keywords = keyword_set(&args.matching, config);
    let options = highlight_options(&args.matching, config);

    let body = fs::read_to_string(&args.file)
        .with_context(|| format!("无法读取 {}", args.file.display()))?;
    let format = match args.format.or_else(|| detect_format(&body)) {
        Some(format) => format,
        None => bail!("无法识别 OCR 输出格式，请用 --format 指定"),
    };

    let img = match &args.image {
        Some(source) => Some(load_image(source).context("无法加载图片")?),
        None => None,
    };
    let natural = match (args.width, args.height, &img) {
        (Some(width), Some(height), _) => (width, height),
        (_, _, Some(img)) => (img.width(), img.height()),
        _ => match page_size(&body, format) {
            Some(size) => size,
            None => bail!("无法确定原图尺寸，请指定 --width/--height 或 --image"),
        },
    };

    let words = parse_str(&body, format)?;
    let display = resolve_display(
        natural,
        args.matching.display_width,
        args.matching.display_height,
    );
    let report = highlight_words(&words, natural, display, &keywords, &options)?;
    log::info!(
        "[CLI] {} 个单词中命中 {} 个",
        report.word_count,
        report.highlights.len()
    );

    if let (Some(path), Some(img)) = (&args.output, &img) {
        write_overlay(img, &report, config, path)?;
    }

    write_report(&report, args.report.as_deref())
}

pub fn run_status(config: &AppConfig) -> Result<()> {
    let status = detect_tesseract_status(&config.tesseract);
    if !status.installed {
        log::warn!("[CLI] 未检测到 Tesseract");
    }
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub fn run_config(action: ConfigAction, config: &AppConfig, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} 已存在，使用 --force 覆盖", path.display());
            }
            save_config(path, &AppConfig::default())?;
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}
