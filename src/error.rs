//! 扫描错误类型
//!
//! 所有终态失败都以 `ScanError` 的形式交给调用方，由调用方负责面向用户的展示。

use thiserror::Error;

/// 扫描流程错误
#[derive(Debug, Error)]
pub enum ScanError {
    /// 网络/传输层失败
    #[error("无法连接扫描仪 ({url}): {source}")]
    Unreachable {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 状态接口返回非 200 或文档格式错误
    #[error("扫描仪状态响应无效 ({url}): {reason}")]
    BadResponse { url: String, reason: String },

    /// 扫描仪在重试耗尽后仍拒绝提交
    #[error("创建扫描任务失败, status: {status}, body: {body}")]
    Rejected { status: u16, body: String },

    /// 扫描仪报告非正常状态
    #[error("扫描仪处于异常状态: {state}")]
    DeviceError { state: String },

    /// 操作员选择放弃
    #[error("扫描已被用户中止")]
    Aborted,

    /// 在尝试次数内文档始终未就绪
    #[error("扫描文档在 {attempts} 次尝试后仍未就绪")]
    NotReady { attempts: u32 },

    /// 取回文档时遇到无法重试的状态码
    #[error("取回文档时收到意外状态码 ({url}): {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// 设备报告成功但没有可用的输出文件
    #[error("扫描报告成功但输出文件不可用: {path}")]
    Inconsistent { path: String },

    /// 不支持的输出格式
    #[error("不支持的输出格式: {0} (支持: pdf, png, jpg, jpeg)")]
    UnsupportedFormat(String),

    /// 输出文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl ScanError {
    /// 创建传输层错误
    pub fn unreachable(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ScanError::Unreachable {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// 创建状态响应错误
    pub fn bad_response(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScanError::BadResponse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// 创建文件操作错误
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// 扫描结果类型
pub type ScanResult<T> = Result<T, ScanError>;
