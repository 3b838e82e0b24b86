use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 扫描仪报告屏幕错误时的处理方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceErrorPolicy {
    /// 在终端询问操作员
    #[default]
    Prompt,
    /// 直接中止
    Abort,
    /// 直接继续重试
    Continue,
}

/// 重试与等待参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTiming {
    /// 单个 HTTP 请求超时
    pub request_timeout: Duration,
    /// 提交任务的最大尝试次数
    pub submit_attempts: u32,
    /// 提交重试间隔
    pub submit_backoff: Duration,
    /// 取回文档的最大尝试次数
    pub poll_attempts: u32,
    /// 取回轮询间隔
    pub poll_interval: Duration,
    /// 提交成功后到第一次取回之前的等待
    pub start_grace: Duration,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            submit_attempts: 5,
            submit_backoff: Duration::from_secs(2),
            poll_attempts: 30,
            poll_interval: Duration::from_secs(1),
            start_grace: Duration::from_secs(2),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 扫描仪地址（http:// 或 https://）
    pub scanner_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 屏幕错误处理方式
    pub on_device_error: DeviceErrorPolicy,
    pub timing: ScanTiming,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scanner_url: String::new(),
            verbose_logging: false,
            on_device_error: DeviceErrorPolicy::Prompt,
            timing: ScanTiming::default(),
        }
    }
}

/// TOML 配置文件，字段均可省略
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    scanner_url: Option<String>,
    verbose_logging: Option<bool>,
    on_device_error: Option<DeviceErrorPolicy>,
    request_timeout_secs: Option<u64>,
    submit_attempts: Option<u32>,
    submit_backoff_secs: Option<u64>,
    poll_attempts: Option<u32>,
    poll_interval_secs: Option<u64>,
    start_grace_secs: Option<u64>,
}

impl Config {
    /// 默认值 → 配置文件（可选）→ 环境变量
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::default().with_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// 读取 TOML 配置文件覆盖当前值
    pub fn with_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        self.with_toml(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    fn with_toml(mut self, content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(v) = file.scanner_url {
            self.scanner_url = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.on_device_error {
            self.on_device_error = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.timing.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.submit_attempts {
            self.timing.submit_attempts = v;
        }
        if let Some(v) = file.submit_backoff_secs {
            self.timing.submit_backoff = Duration::from_secs(v);
        }
        if let Some(v) = file.poll_attempts {
            self.timing.poll_attempts = v;
        }
        if let Some(v) = file.poll_interval_secs {
            self.timing.poll_interval = Duration::from_secs(v);
        }
        if let Some(v) = file.start_grace_secs {
            self.timing.start_grace = Duration::from_secs(v);
        }
        Ok(self)
    }

    /// 用环境变量覆盖当前值，无法解析的值保持原样
    pub fn with_env<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };
        let timing = ScanTiming {
            request_timeout: secs("SCAN_REQUEST_TIMEOUT_SECS", self.timing.request_timeout),
            submit_attempts: lookup("SCAN_SUBMIT_ATTEMPTS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(self.timing.submit_attempts),
            submit_backoff: secs("SCAN_SUBMIT_BACKOFF_SECS", self.timing.submit_backoff),
            poll_attempts: lookup("SCAN_POLL_ATTEMPTS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(self.timing.poll_attempts),
            poll_interval: secs("SCAN_POLL_INTERVAL_SECS", self.timing.poll_interval),
            start_grace: secs("SCAN_START_GRACE_SECS", self.timing.start_grace),
        };

        Self {
            scanner_url: lookup("SCANNER_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(self.scanner_url),
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(self.verbose_logging),
            on_device_error: lookup("SCAN_ON_DEVICE_ERROR")
                .and_then(|v| <DeviceErrorPolicy as clap::ValueEnum>::from_str(v.trim(), true).ok())
                .unwrap_or(self.on_device_error),
            timing,
        }
    }

    /// 校验必填项
    pub fn validate(&self) -> Result<()> {
        if self.scanner_url.is_empty() {
            bail!("SCANNER_URL 为必填项（可通过 --scanner-url 参数或 SCANNER_URL 环境变量设置）");
        }
        if !self.scanner_url.starts_with("http://") && !self.scanner_url.starts_with("https://") {
            bail!("扫描仪地址必须以 http:// 或 https:// 开头: {}", self.scanner_url);
        }
        if self.timing.submit_attempts == 0 {
            bail!("提交尝试次数必须大于 0 (SCAN_SUBMIT_ATTEMPTS)");
        }
        if self.timing.poll_attempts == 0 {
            bail!("取回尝试次数必须大于 0 (SCAN_POLL_ATTEMPTS)");
        }
        Ok(())
    }
}
