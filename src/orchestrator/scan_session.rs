//! 单次扫描编排器 - 编排层
//!
//! ## 状态机
//!
//! ```text
//! Idle → Submitting → AwaitingStart → Polling → Verifying → Done
//!            │                           │          │
//!            └───────────────────────────┴──────────┴──→ Failed
//! ```
//!
//! 各阶段严格顺序执行，失败不会跨阶段重试。

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::ScanTiming;
use crate::error::{ScanError, ScanResult};
use crate::infrastructure::Transport;
use crate::models::{Artifact, ScanRequest};
use crate::services::Confirmer;
use crate::workflow::{DocumentPoller, JobSubmitter};

/// 扫描阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Submitting,
    AwaitingStart,
    Polling,
    Verifying,
    Done,
    Failed,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanPhase::Idle => "空闲",
            ScanPhase::Submitting => "提交任务",
            ScanPhase::AwaitingStart => "等待开始",
            ScanPhase::Polling => "取回文档",
            ScanPhase::Verifying => "校验文件",
            ScanPhase::Done => "完成",
            ScanPhase::Failed => "失败",
        };
        write!(f, "{}", name)
    }
}

/// eSCL 扫描仪
///
/// 持有传输和确认能力，按顺序调度提交、等待、取回、校验。
pub struct EsclScanner {
    transport: Arc<dyn Transport>,
    confirmer: Arc<dyn Confirmer>,
    submitter: JobSubmitter,
    poller: DocumentPoller,
    start_grace: Duration,
}

impl EsclScanner {
    pub fn new(
        transport: Arc<dyn Transport>,
        confirmer: Arc<dyn Confirmer>,
        timing: &ScanTiming,
    ) -> Self {
        Self {
            transport,
            confirmer,
            submitter: JobSubmitter::new(timing),
            poller: DocumentPoller::new(timing),
            start_grace: timing.start_grace,
        }
    }

    /// 执行一次完整扫描，输出写入 `destination`
    ///
    /// # 返回
    /// 成功时返回非空的输出文件；其它情况返回对应的 `ScanError`
    pub async fn scan(&self, request: &ScanRequest, destination: &Path) -> ScanResult<Artifact> {
        let mut phase = ScanPhase::Idle;
        info!(
            "通过 eSCL 扫描到: {} (格式: {})",
            destination.display(),
            request.kind()
        );

        match self.run(request, destination, &mut phase).await {
            Ok(artifact) => {
                enter(&mut phase, ScanPhase::Done);
                Ok(artifact)
            }
            Err(e) => {
                error!("[{}] 扫描失败: {}", phase, e);
                enter(&mut phase, ScanPhase::Failed);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        request: &ScanRequest,
        destination: &Path,
        phase: &mut ScanPhase,
    ) -> ScanResult<Artifact> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScanError::io(parent, e))?;
        }

        enter(phase, ScanPhase::Submitting);
        let job = self
            .submitter
            .submit(self.transport.as_ref(), self.confirmer.as_ref(), request)
            .await?;
        info!("扫描任务已创建: {}", job);

        enter(phase, ScanPhase::AwaitingStart);
        sleep(self.start_grace).await;

        enter(phase, ScanPhase::Polling);
        let artifact = self
            .poller
            .retrieve(
                self.transport.as_ref(),
                self.confirmer.as_ref(),
                request.base_url(),
                &job,
                destination,
            )
            .await?;

        enter(phase, ScanPhase::Verifying);
        verify(&artifact).await?;

        Ok(artifact)
    }
}

fn enter(phase: &mut ScanPhase, next: ScanPhase) {
    debug!("阶段: {} → {}", phase, next);
    *phase = next;
}

/// 确认输出文件存在且非空，否则删除残留并返回 `Inconsistent`
async fn verify(artifact: &Artifact) -> ScanResult<()> {
    let path = artifact.path();
    let len = match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => 0,
    };

    if len == 0 {
        if let Err(e) = fs::remove_file(path).await {
            debug!("删除无效输出文件失败 {}: {}", path.display(), e);
        }
        return Err(ScanError::Inconsistent {
            path: path.display().to_string(),
        });
    }

    Ok(())
}
