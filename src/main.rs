//! rsfinger 命令行入口

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::error;
use tracing_subscriber::EnvFilter;

use rsfinger::utils::read_target_file;
use rsfinger::{
    AfrogScanner, ConfigManager, ConsoleReporter, FingerDetector, GlobalConfig,
    JsonLinesReporter, MultiReporter, RsFingerError, VulnScanner,
};

/// 并发 Web 指纹识别，可联动 afrog 漏洞扫描
#[derive(Parser, Debug)]
#[command(name = "rsfinger", version, about, long_about = None)]
struct Cli {
    /// 单个扫描目标
    #[arg(short = 'u', long = "url")]
    url: Option<String>,

    /// 目标列表文件（每行一个）
    #[arg(long = "uf", visible_alias = "url-file")]
    url_file: Option<PathBuf>,

    /// 将命中的指纹标签交给 afrog 扫描
    #[arg(long = "auto")]
    auto: bool,

    /// 指纹规则目录
    #[arg(short = 'r', long = "rules", default_value = "web_fingerprint")]
    rules: PathBuf,

    /// 同时扫描的目标数
    #[arg(short = 'c', long = "concurrency", default_value_t = 10)]
    concurrency: usize,

    /// 单次请求超时（秒）
    #[arg(long = "timeout", default_value_t = 10)]
    timeout: u64,

    /// afrog 可执行文件路径
    #[arg(long = "afrog", default_value = "afrog")]
    afrog: PathBuf,

    /// 结果输出文件（JSON Lines）
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let config = build_config(&cli);
    init_tracing(config.verbose);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let fatal = e
                .downcast_ref::<RsFingerError>()
                .is_some_and(RsFingerError::is_fatal);
            if fatal {
                error!("规则加载失败，终止启动：{:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}

/// 兼容单横线长参数 `-uf`、`-auto`
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-uf") => OsString::from("--uf"),
            Some("-auto") => OsString::from("--auto"),
            _ => arg,
        })
        .collect()
}

fn build_config(cli: &Cli) -> GlobalConfig {
    ConfigManager::custom()
        .rule_dir(cli.rules.clone())
        .concurrency(cli.concurrency)
        .http_timeout(Duration::from_secs(cli.timeout))
        .auto_scan(cli.auto)
        .scanner_binary(cli.afrog.clone())
        .verbose(cli.verbose)
        .build()
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "rsfinger=debug" } else { "rsfinger=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: GlobalConfig) -> anyhow::Result<()> {
    let targets = if let Some(url) = &cli.url {
        vec![url.clone()]
    } else if let Some(path) = &cli.url_file {
        read_target_file(path)
            .await
            .with_context(|| format!("读取目标文件失败：{}", path.display()))?
    } else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let detector = FingerDetector::new(config)
        .await
        .context("加载指纹规则失败")?;

    let mut reporter = MultiReporter::new().with(Box::new(ConsoleReporter));
    if let Some(output) = &cli.output {
        let file_reporter = JsonLinesReporter::create(output)
            .with_context(|| format!("创建输出文件失败：{}", output.display()))?;
        reporter = reporter.with(Box::new(file_reporter));
    }

    let afrog = AfrogScanner::from_config(detector.config());
    let scanner: Option<&dyn VulnScanner> = if detector.config().auto_scan {
        Some(&afrog)
    } else {
        None
    };

    println!("Scanning targets count: {}", targets.len());
    let start = Instant::now();
    let summary = detector.run(targets, &mut reporter, scanner).await;
    println!(
        "Scan completed in {:?}（结果={}，命中={}，联动扫描={}）",
        start.elapsed(),
        summary.total,
        summary.matched,
        summary.escalated
    );

    Ok(())
}
