//! 重试预算
//!
//! 每个阶段（提交、取回）各持有一份。只有操作员在确认环节选择继续时才会重置。

/// 重试预算
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    used: u32,
}

impl RetryBudget {
    /// 创建新的预算
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            used: 0,
        }
    }

    /// 开始一次新的尝试
    ///
    /// 返回本次尝试的序号（从 1 开始），预算耗尽时返回 `None`。
    pub fn start_attempt(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        self.used += 1;
        Some(self.used)
    }

    /// 是否已耗尽
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max_attempts
    }

    /// 已使用的尝试次数
    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 人工介入后恢复为初始预算
    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }
}
