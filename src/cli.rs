//! 命令行参数
//!
//! 使用 `clap` derive 宏声明参数。命令行参数优先于配置文件和环境变量。

use crate::config::{Config, DeviceErrorPolicy};
use clap::Parser;
use std::path::PathBuf;

/// 通过 eSCL (AirScan) 协议从网络扫描仪扫描文档
#[derive(Parser, Debug)]
#[command(name = "escl-scan")]
#[command(version)]
#[command(
    about = "通过 eSCL (AirScan) 协议从网络扫描仪扫描文档",
    after_help = "环境变量（可写在 .env 文件中）:\n  SCANNER_URL             扫描仪地址（必填）\n  SCAN_ON_DEVICE_ERROR    prompt / abort / continue\n  VERBOSE_LOGGING         true / false"
)]
pub struct Args {
    /// 输出文件路径，扩展名决定格式（pdf / png / jpg / jpeg）
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// 扫描仪地址（覆盖 SCANNER_URL 环境变量）
    #[arg(long = "scanner-url", value_name = "URL")]
    pub scanner_url: Option<String>,

    /// TOML 配置文件
    #[arg(short, long, env = "SCAN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 扫描仪屏幕出现错误时的处理方式
    #[arg(long = "on-device-error", value_enum)]
    pub on_device_error: Option<DeviceErrorPolicy>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 用命令行参数覆盖配置
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.scanner_url {
            config.scanner_url = url.clone();
        }
        if let Some(policy) = self.on_device_error {
            config.on_device_error = policy;
        }
        if self.verbose {
            config.verbose_logging = true;
        }
    }
}
