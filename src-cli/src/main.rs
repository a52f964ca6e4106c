mod commands;
mod config;
mod input;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{ConfigAction, ParseArgs, ScanArgs};
use config::AppConfig;

/// 在 OCR 结果中查找关键词并高亮标注
#[derive(Parser, Debug)]
#[command(name = "linch-highlight", version, about = "OCR 关键词高亮工具")]
struct Cli {
    /// 配置文件路径（默认读取 LINCH_HIGHLIGHT_CONFIG 或 ./linch-highlight.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 识别图片并高亮关键词
    Scan(ScanArgs),
    /// 对已保存的 OCR 输出做关键词高亮
    Parse(ParseArgs),
    /// 检测 Tesseract 安装状态
    Status,
    /// 管理配置文件
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = config::config_path(cli.config.as_deref());
    // init 不读取现有文件
    let app_config = match &cli.command {
        Command::Config {
            action: ConfigAction::Init { .. },
        } => AppConfig::default(),
        _ => config::load_config(&config_path)
            .with_context(|| format!("无法读取配置 {}", config_path.display()))?,
    };

    log::debug!("[CLI] {:?}", cli.command);

    match cli.command {
        Command::Scan(args) => commands::run_scan(args, &app_config),
        Command::Parse(args) => commands::run_parse(args, &app_config),
        Command::Status => commands::run_status(&app_config),
        Command::Config { action } => commands::run_config(action, &app_config, &config_path),
    }
}
