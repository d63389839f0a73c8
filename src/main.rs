//! Teams Test Notifier CLI
//!
//! 读取测试运行结果，生成 Adaptive Card 并推送到 Teams / Power Automate

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use teams_test_notifier::{
    process_results, render_payload, NotifierOptions, ReportOutcome, ReqwestTransport, SuiteNode, WebhookConfig,
    WebhookKind,
};

#[derive(Parser)]
#[command(name = "ttn")]
#[command(about = "Teams Test Notifier - 推送测试结果卡片")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 发送测试结果通知
    Send {
        /// 套件结果 JSON 文件
        #[arg(long)]
        suite: PathBuf,
        /// 配置文件（默认自动查找）
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// 报告文件，指定后自动开启明细
        #[arg(long)]
        report: Option<PathBuf>,
        /// 附加图表
        #[arg(long)]
        chart: bool,
        /// 请求超时（秒）
        #[arg(long, default_value = "30")]
        timeout: u64,
        /// 只打印载荷，不发送
        #[arg(long)]
        dry_run: bool,
    },
    /// 打印将要发送的载荷 JSON
    Preview {
        /// 套件结果 JSON 文件
        #[arg(long)]
        suite: PathBuf,
        /// 配置文件（默认自动查找）
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// 报告文件
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// 校验 webhook URL 格式
    CheckUrl {
        url: String,
        /// msteams | powerautomate
        #[arg(long, default_value = "powerautomate")]
        kind: String,
    },
}

fn load_options(config: Option<PathBuf>, report: Option<PathBuf>) -> Result<NotifierOptions> {
    let mut options = NotifierOptions::auto_load(config.as_deref())?;
    if let Some(report) = report {
        options = options.report_path(report).show_details(true);
    }
    Ok(options)
}

fn print_payload(suite: &SuiteNode, options: &NotifierOptions) -> Result<()> {
    match render_payload(Some(suite), options)? {
        Some(body) => {
            let value: serde_json::Value = serde_json::from_str(&body)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        None => eprintln!("Notification would be skipped"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("teams_test_notifier=info,ttn=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            suite,
            config,
            report,
            chart,
            timeout,
            dry_run,
        } => {
            let suite = SuiteNode::load(&suite)?;
            let options = load_options(config, report)?.include_chart(chart);

            if dry_run {
                return print_payload(&suite, &options);
            }

            let transport = ReqwestTransport::new(WebhookConfig { timeout_secs: timeout })?;
            match process_results(Some(&suite), &options, &transport).await {
                ReportOutcome::Sent(outcome) => {
                    info!(status = outcome.status, "Notification delivered");
                }
                ReportOutcome::Skipped(reason) => {
                    info!(reason = %reason, "Notification skipped");
                }
                // 尽力而为：通知失败不影响退出码
                ReportOutcome::Failed(e) => {
                    error!(error = %e, "Notification failed");
                }
            }
        }
        Commands::Preview { suite, config, report } => {
            let suite = SuiteNode::load(&suite)?;
            let options = load_options(config, report)?;
            print_payload(&suite, &options)?;
        }
        Commands::CheckUrl { url, kind } => {
            let kind = WebhookKind::parse(&kind).with_context(|| format!("Unknown webhook kind: {}", kind))?;
            if kind.is_valid_url(&url) {
                println!("✅ valid {} webhook URL", kind);
            } else {
                println!("❌ not a valid {} webhook URL", kind);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
