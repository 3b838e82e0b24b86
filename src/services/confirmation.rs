//! 用户确认服务 - 业务能力层
//!
//! 只负责"请操作员清除扫描仪屏幕上的错误并决定是否继续"能力。
//! 这是整个流程中唯一会无限期阻塞等待人工输入的地方。

use async_trait::async_trait;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// 操作员的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 已处理，继续重试
    Continue,
    /// 放弃本次扫描
    Abort,
}

impl Decision {
    /// 解析操作员输入
    ///
    /// 去除空白后大小写不敏感地等于 `quit` 或 `q` 时放弃，其余（包括直接回车）继续。
    pub fn from_reply(reply: &str) -> Self {
        let reply = reply.trim().to_lowercase();
        if reply == "quit" || reply == "q" {
            Decision::Abort
        } else {
            Decision::Continue
        }
    }
}

/// 确认能力
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self) -> Decision;
}

/// 向 `writer` 输出提示并从 `reader` 读取一行
///
/// 输入流关闭或读取失败时返回 `Abort`，避免无限循环。
pub fn ask_operator<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Decision {
    let prompt = "\n⚠️  扫描仪屏幕上似乎显示了错误。\n\
                  请检查扫描仪并清除错误信息。\n\
                  按回车键重试扫描，或输入 'quit' 中止: ";
    if let Err(e) = writer.write_all(prompt.as_bytes()).and_then(|_| writer.flush()) {
        warn!("无法输出提示信息: {}", e);
    }

    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => {
            warn!("输入流已关闭，中止扫描");
            Decision::Abort
        }
        Ok(_) => Decision::from_reply(&input),
        Err(e) => {
            warn!("读取用户输入失败: {}", e);
            Decision::Abort
        }
    }
}

/// 终端交互确认（标准输入 / 标准错误）
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleConfirmer;

#[async_trait]
impl Confirmer for ConsoleConfirmer {
    async fn confirm(&self) -> Decision {
        let decision = tokio::task::spawn_blocking(|| {
            let stdin = std::io::stdin();
            let stderr = std::io::stderr();
            ask_operator(&mut stdin.lock(), &mut stderr.lock())
        })
        .await
        .unwrap_or_else(|e| {
            warn!("等待用户输入的任务失败: {}", e);
            Decision::Abort
        });

        info!("用户选择: {:?}", decision);
        decision
    }
}

/// 非交互模式：总是放弃
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysAbort;

#[async_trait]
impl Confirmer for AlwaysAbort {
    async fn confirm(&self) -> Decision {
        info!("非交互模式: 扫描仪报告错误，直接中止");
        Decision::Abort
    }
}

/// 非交互模式：总是继续
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysContinue;

#[async_trait]
impl Confirmer for AlwaysContinue {
    async fn confirm(&self) -> Decision {
        info!("非交互模式: 扫描仪报告错误，继续重试");
        Decision::Continue
    }
}
