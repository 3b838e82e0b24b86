use crate::config::{Config, DeviceErrorPolicy};
use crate::infrastructure::HttpTransport;
use crate::models::{OutputKind, ScanRequest};
use crate::orchestrator::EsclScanner;
use crate::services::{AlwaysAbort, AlwaysContinue, ConsoleConfirmer, Confirmer};
use crate::utils::logging;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// 应用主结构
pub struct App {
    config: Config,
    output: Option<PathBuf>,
    scanner: EsclScanner,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config, output: Option<PathBuf>) -> Result<Self> {
        config.validate()?;

        let transport = Arc::new(HttpTransport::new(config.timing.request_timeout)?);
        let scanner = EsclScanner::new(
            transport,
            confirmer_for(config.on_device_error),
            &config.timing,
        );

        Ok(Self {
            config,
            output,
            scanner,
        })
    }

    /// 运行一次扫描，返回输出文件路径
    pub async fn run(&self) -> Result<PathBuf> {
        logging::log_startup(&self.config);

        let kind = output_kind_for(self.output.as_deref())?;
        let destination = match &self.output {
            Some(path) => path.clone(),
            None => default_destination(kind),
        };

        let request = ScanRequest::new(&self.config.scanner_url, kind);
        let started = Instant::now();
        let artifact = self.scanner.scan(&request, &destination).await?;

        logging::log_scan_complete(artifact.path(), artifact.bytes(), started.elapsed());
        Ok(artifact.into_path())
    }
}

/// 根据屏幕错误处理方式选择确认实现
pub fn confirmer_for(policy: DeviceErrorPolicy) -> Arc<dyn Confirmer> {
    match policy {
        DeviceErrorPolicy::Prompt => Arc::new(ConsoleConfirmer),
        DeviceErrorPolicy::Abort => Arc::new(AlwaysAbort),
        DeviceErrorPolicy::Continue => Arc::new(AlwaysContinue),
    }
}

/// 由输出路径的扩展名决定格式，未指定输出时默认 PDF
pub fn output_kind_for(output: Option<&Path>) -> Result<OutputKind> {
    let Some(path) = output else {
        return Ok(OutputKind::Document);
    };
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        bail!("输出路径必须带有文件扩展名 (如 .pdf, .png, .jpg): {}", path.display());
    };
    Ok(OutputKind::from_extension(ext)?)
}

/// 默认输出位置：`<临时目录>/escl-scan/scan-<时间戳><扩展名>`
pub fn default_destination(kind: OutputKind) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    std::env::temp_dir()
        .join("escl-scan")
        .join(format!("scan-{}{}", timestamp, kind.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_kind_for() {
        assert_eq!(output_kind_for(None).unwrap(), OutputKind::Document);
        assert_eq!(
            output_kind_for(Some(Path::new("scans/receipt.JPG"))).unwrap(),
            OutputKind::ImageLossy
        );
        assert!(output_kind_for(Some(Path::new("scan"))).is_err());
        assert!(output_kind_for(Some(Path::new("scan.tiff"))).is_err());
    }

    #[test]
    fn test_default_destination() {
        let path = default_destination(OutputKind::ImageLossless);
        assert!(path.starts_with(std::env::temp_dir().join("escl-scan")));

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("scan-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_initialize_requires_scanner_url() {
        assert!(App::initialize(Config::default(), None).is_err());
    }
}
