//! # eSCL Scan
//!
//! 通过 eSCL (AirScan) HTTP 协议驱动网络扫描仪完成一次扫描
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `Transport` - GET / POST 能力，测试时可替换为脚本化实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `status_prober` - 查询扫描仪状态
//! - `Confirmer` - 请操作员清除屏幕错误并决定继续或放弃
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义单个阶段的完整处理流程
//! - `RetryBudget` - 每个阶段的重试预算，人工介入后重置
//! - `OperatorGate` - 每个阶段最多询问一次操作员
//! - `JobSubmitter` - 提交扫描任务（重试 + 503 人工确认）
//! - `DocumentPoller` - 轮询取回扫描文档
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 提交 → 等待 → 取回 → 校验
//!
//! ## 模块结构

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::{Config, DeviceErrorPolicy, ScanTiming};
pub use error::{ScanError, ScanResult};
pub use infrastructure::{HttpResponse, HttpTransport, Transport};
pub use models::{Artifact, DeviceStatus, JobHandle, OutputKind, ScanRequest};
pub use orchestrator::{EsclScanner, ScanPhase};
pub use services::{Confirmer, Decision};
pub use workflow::{DocumentPoller, JobSubmitter, RetryBudget};
