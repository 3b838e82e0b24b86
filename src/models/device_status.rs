//! 扫描仪状态快照
//!
//! 只描述某一时刻的状态，不做缓存。

use regex::Regex;
use std::sync::OnceLock;

/// 不代表屏幕错误的状态
const BENIGN_STATES: [&str; 2] = ["Idle", "Processing"];

fn root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<(?:[\w-]+:)?ScannerStatus[\s>/]").expect("合法的正则"))
}

fn state_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(?:[\w-]+:)?State>\s*([^<]*?)\s*</(?:[\w-]+:)?State>").expect("合法的正则")
    })
}

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(?:[\w-]+:)?Version>\s*([^<]*?)\s*</(?:[\w-]+:)?Version>")
            .expect("合法的正则")
    })
}

/// 扫描仪状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatus {
    /// 状态标签，如 `Idle`、`Processing`、`Stopped`
    pub state: String,
    /// eSCL 协议版本
    pub version: Option<String>,
}

impl DeviceStatus {
    /// 状态接口地址
    pub fn url(base_url: &str) -> String {
        format!("{}/eSCL/ScannerStatus", base_url.trim_end_matches('/'))
    }

    /// 解析 ScannerStatus XML
    ///
    /// 缺少根元素或 `State` 元素时返回错误原因。
    pub fn parse(xml: &str) -> Result<Self, String> {
        if !root_regex().is_match(xml) {
            return Err("缺少 ScannerStatus 根元素".to_string());
        }

        let state = state_regex()
            .captures(xml)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "缺少 State 元素".to_string())?;

        let version = version_regex()
            .captures(xml)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self { state, version })
    }

    /// 是否为正常状态（空闲或处理中）
    pub fn is_benign(&self) -> bool {
        BENIGN_STATES.contains(&self.state.as_str())
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} (eSCL {})", self.state, version),
            None => write!(f, "{}", self.state),
        }
    }
}
