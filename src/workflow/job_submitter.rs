//! 扫描任务提交 - 流程层
//!
//! 流程：
//! 1. POST ScanSettings → 201 + Location
//! 2. 第一次 503 → 查询状态（仅记录）→ 询问操作员
//! 3. 其它失败按固定间隔重试，直到预算耗尽

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScanTiming;
use crate::error::{ScanError, ScanResult};
use crate::infrastructure::{read_text, Transport};
use crate::models::{JobHandle, ScanRequest};
use crate::services::{status_prober, Confirmer};
use crate::utils::logging::truncate_text;
use crate::workflow::{OperatorGate, RetryBudget};

const STATUS_CREATED: u16 = 201;
const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

/// 扫描任务提交器
///
/// - 不持有任何资源（transport / confirmer 由调用方传入）
/// - 只负责提交这一个阶段
pub struct JobSubmitter {
    max_attempts: u32,
    backoff: Duration,
}

impl JobSubmitter {
    pub fn new(timing: &ScanTiming) -> Self {
        Self {
            max_attempts: timing.submit_attempts,
            backoff: timing.submit_backoff,
        }
    }

    /// 提交扫描任务
    ///
    /// # 返回
    /// 成功时返回任务句柄；失败时返回 `Rejected` / `Unreachable` / `Aborted`
    pub async fn submit(
        &self,
        transport: &dyn Transport,
        confirmer: &dyn Confirmer,
        request: &ScanRequest,
    ) -> ScanResult<JobHandle> {
        let url = request.jobs_url();
        let settings = request.settings_xml();
        debug!("ScanSettings: {}", settings);

        let mut budget = RetryBudget::new(self.max_attempts);
        let mut gate = OperatorGate::new(confirmer, "提交");
        let mut last_error: Option<ScanError> = None;

        while let Some(attempt) = budget.start_attempt() {
            if attempt > 1 {
                info!(
                    "重试创建扫描任务 (尝试 {}/{})...",
                    attempt,
                    budget.max_attempts()
                );
                sleep(self.backoff).await;
            }

            let mut response = match transport.post(&url, "text/xml", settings.clone()).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("提交扫描任务失败: {}", e);
                    last_error = Some(e);
                    continue;
                }
            };

            let status = response.status();
            if status == STATUS_CREATED {
                return match response.header("Location") {
                    Some(location) => JobHandle::from_location(&location).ok_or_else(|| {
                        ScanError::Rejected {
                            status,
                            body: format!("无效的 Location 头: {}", location),
                        }
                    }),
                    None => Err(ScanError::Rejected {
                        status,
                        body: "响应中没有 Location 头".to_string(),
                    }),
                };
            }

            let body = read_text(response.as_mut()).await.unwrap_or_default();

            if status == STATUS_SERVICE_UNAVAILABLE && gate.is_available() {
                warn!("扫描仪返回 503 Service Unavailable");
                match status_prober::probe(transport, request.base_url()).await {
                    Ok(device) => info!("扫描仪状态: {}", device.state),
                    Err(e) => warn!("警告: 查询扫描仪状态失败: {}", e),
                }

                // 503 通常意味着屏幕上有错误，不论状态查询结果都询问操作员
                gate.escalate(&mut budget).await?;
                continue;
            }

            warn!(
                "创建扫描任务失败 (尝试 {}/{}), status: {}, body: {}",
                attempt,
                budget.max_attempts(),
                status,
                truncate_text(&body, 200)
            );
            last_error = Some(ScanError::Rejected { status, body });
        }

        Err(last_error.unwrap_or(ScanError::Rejected {
            status: 0,
            body: format!("{} 次尝试后仍未创建扫描任务", self.max_attempts),
        }))
    }
}
