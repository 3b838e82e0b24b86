//! 扫描文档取回 - 流程层
//!
//! 流程：
//! 1. 轮询 NextDocument
//! 2. 200 → 写入输出文件（唯一的成功路径）
//! 3. 404 → 尚未就绪，等待后重试
//! 4. 503 → 查询状态，非正常状态时询问操作员一次；否则按未就绪处理
//! 5. 其它状态码 → 直接失败
//! 6. 次数耗尽 → 询问过操作员且最后仍是 503 时重新查询一次状态，
//!    仍为非正常状态才报告设备错误

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScanTiming;
use crate::error::{ScanError, ScanResult};
use crate::infrastructure::{HttpResponse, Transport};
use crate::models::{Artifact, JobHandle};
use crate::services::{status_prober, Confirmer};
use crate::workflow::{OperatorGate, RetryBudget};

const STATUS_OK: u16 = 200;
const STATUS_NOT_FOUND: u16 = 404;
const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// 最近一次尝试的结果
enum LastOutcome {
    NotFound,
    Unavailable,
    TransportFailed(ScanError),
}

/// 扫描文档取回器
pub struct DocumentPoller {
    max_attempts: u32,
    interval: Duration,
}

impl DocumentPoller {
    pub fn new(timing: &ScanTiming) -> Self {
        Self {
            max_attempts: timing.poll_attempts,
            interval: timing.poll_interval,
        }
    }

    /// 取回扫描文档并写入 `destination`
    ///
    /// # 返回
    /// 成功时返回输出文件；失败时不会留下任何文件
    pub async fn retrieve(
        &self,
        transport: &dyn Transport,
        confirmer: &dyn Confirmer,
        base_url: &str,
        job: &JobHandle,
        destination: &Path,
    ) -> ScanResult<Artifact> {
        let url = job.next_document_url(base_url);
        let mut budget = RetryBudget::new(self.max_attempts);
        let mut gate = OperatorGate::new(confirmer, "取回");
        let mut last = LastOutcome::NotFound;

        while let Some(attempt) = budget.start_attempt() {
            info!(
                "正在尝试下载扫描文档 (尝试 {}/{})...",
                attempt,
                budget.max_attempts()
            );

            let response = match transport.get_stream(&url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("请求扫描文档失败: {}", e);
                    last = LastOutcome::TransportFailed(e);
                    self.pause(&budget).await;
                    continue;
                }
            };

            match response.status() {
                STATUS_OK => {
                    let artifact = write_artifact(response, destination).await?;
                    info!("✓ 扫描文档下载成功 ({} 字节)", artifact.bytes());
                    return Ok(artifact);
                }
                STATUS_NOT_FOUND => {
                    debug!("文档尚未就绪");
                    last = LastOutcome::NotFound;
                }
                STATUS_SERVICE_UNAVAILABLE => {
                    last = LastOutcome::Unavailable;
                    if gate.is_available() {
                        match status_prober::probe(transport, base_url).await {
                            Ok(device) => {
                                info!("扫描仪状态: {}", device.state);
                                if !device.is_benign() {
                                    gate.escalate(&mut budget).await?;
                                    continue;
                                }
                            }
                            Err(e) => warn!("警告: 查询扫描仪状态失败: {}", e),
                        }
                    }
                }
                other => {
                    return Err(ScanError::UnexpectedStatus {
                        url: url.clone(),
                        status: other,
                    });
                }
            }

            self.pause(&budget).await;
        }

        warn!("扫描文档在 {} 次尝试后仍未就绪", self.max_attempts);
        let not_ready = ScanError::NotReady {
            attempts: self.max_attempts,
        };
        Err(match last {
            LastOutcome::TransportFailed(e) => e,
            LastOutcome::Unavailable if !gate.is_available() => {
                match still_faulted(transport, base_url).await {
                    Some(state) => ScanError::DeviceError { state },
                    None => not_ready,
                }
            }
            LastOutcome::Unavailable | LastOutcome::NotFound => not_ready,
        })
    }

    /// 还有剩余尝试时才等待
    async fn pause(&self, budget: &RetryBudget) {
        if !budget.is_exhausted() {
            sleep(self.interval).await;
        }
    }
}

/// 重新查询状态，仍为非正常状态时返回该状态
async fn still_faulted(transport: &dyn Transport, base_url: &str) -> Option<String> {
    match status_prober::probe(transport, base_url).await {
        Ok(device) if !device.is_benign() => {
            warn!("操作员处理后扫描仪仍处于 {} 状态", device.state);
            Some(device.state)
        }
        Ok(device) => {
            debug!("扫描仪已恢复为 {}", device.state);
            None
        }
        Err(e) => {
            warn!("警告: 查询扫描仪状态失败: {}", e);
            None
        }
    }
}

/// 临时文件路径：`<destination>.part`
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// 将响应体写入输出文件
///
/// 先写入 `.part` 文件，完整写入后再改名；任何一步失败都会删除临时文件。
async fn write_artifact(
    mut response: Box<dyn HttpResponse>,
    destination: &Path,
) -> ScanResult<Artifact> {
    let partial = partial_path(destination);

    match stream_to_file(response.as_mut(), &partial).await {
        Ok(bytes) => {
            fs::rename(&partial, destination)
                .await
                .map_err(|e| ScanError::io(destination, e))?;
            Ok(Artifact::new(destination.to_path_buf(), bytes))
        }
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(&partial).await {
                debug!("删除临时文件失败 {}: {}", partial.display(), remove_err);
            }
            Err(e)
        }
    }
}

async fn stream_to_file(response: &mut dyn HttpResponse, path: &Path) -> ScanResult<u64> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| ScanError::io(path, e))?;

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)
            .await
            .map_err(|e| ScanError::io(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| ScanError::io(path, e))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/escl-scan/scan-1.pdf")),
            PathBuf::from("/tmp/escl-scan/scan-1.pdf.part")
        );
    }
}
