//! 人工确认关口
//!
//! 每个阶段每次扫描最多询问操作员一次；之后同样的问题交给普通重试处理。

use crate::error::{ScanError, ScanResult};
use crate::services::{Confirmer, Decision};
use crate::workflow::RetryBudget;
use tracing::{info, warn};

/// 人工确认关口
pub struct OperatorGate<'a> {
    confirmer: &'a dyn Confirmer,
    phase: &'static str,
    used: bool,
}

impl<'a> OperatorGate<'a> {
    /// 为某个阶段创建关口
    pub fn new(confirmer: &'a dyn Confirmer, phase: &'static str) -> Self {
        Self {
            confirmer,
            phase,
            used: false,
        }
    }

    /// 本阶段是否还可以询问操作员
    pub fn is_available(&self) -> bool {
        !self.used
    }

    /// 询问操作员
    ///
    /// 选择继续时重置 `budget`；选择放弃时返回 `Aborted`。
    pub async fn escalate(&mut self, budget: &mut RetryBudget) -> ScanResult<()> {
        debug_assert!(!self.used, "同一阶段只能询问一次");
        self.used = true;

        warn!("[{}] 🙋 请求人工处理扫描仪错误", self.phase);
        match self.confirmer.confirm().await {
            Decision::Abort => {
                warn!("[{}] ❌ 用户中止扫描", self.phase);
                Err(ScanError::Aborted)
            }
            Decision::Continue => {
                budget.reset();
                info!(
                    "[{}] ✓ 用户已处理，重试次数重置为 {}",
                    self.phase,
                    budget.max_attempts()
                );
                Ok(())
            }
        }
    }
}
