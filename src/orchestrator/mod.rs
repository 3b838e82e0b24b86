//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责单次扫描的阶段调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::EsclScanner (提交 → 等待 → 取回 → 校验)
//!     ↓
//! workflow (JobSubmitter / DocumentPoller / OperatorGate / RetryBudget)
//!     ↓
//! services (能力层：状态查询 / 用户确认)
//!     ↓
//! infrastructure (基础设施：Transport)
//! ```
//!
//! ## 设计原则
//!
//! 1. **顺序执行**：同一时间只有一个阶段在运行
//! 2. **资源隔离**：只有编排层持有 Transport 和 Confirmer
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **不跨阶段重试**：提交失败不会重新开始整个扫描

pub mod scan_session;

pub use scan_session::{EsclScanner, ScanPhase};
