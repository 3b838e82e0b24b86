use anyhow::Result;
use clap::Parser;
use escl_scan::cli::Args;
use escl_scan::utils::logging;
use escl_scan::{App, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 加载 .env（不存在时只提示）
    let dotenv_result = dotenvy::dotenv();

    // 加载配置：默认值 → 配置文件 → 环境变量 → 命令行
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);
    if let Err(e) = dotenv_result {
        warn!("未找到 .env 文件，使用环境变量: {}", e);
    }

    // 初始化并运行应用
    let scan_file = App::initialize(config, args.output.clone())?.run().await?;

    info!("扫描文件: {}", scan_file.display());
    println!("{}", scan_file.display());

    Ok(())
}
