use regex::Regex;
use std::sync::OnceLock;

fn job_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/ScanJobs/([^/?#]+)/?$").expect("合法的正则"))
}

/// 扫描任务句柄
///
/// 由提交成功时的 `Location` 响应头得到，可以是绝对地址也可以是相对路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    location: String,
    job_id: String,
}

impl JobHandle {
    /// 从 `Location` 头解析任务句柄
    pub fn from_location(location: &str) -> Option<Self> {
        let location = location.trim();
        let job_id = job_id_regex()
            .captures(location)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().to_string())?;

        Some(Self {
            location: location.to_string(),
            job_id,
        })
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// 文档取回地址
    pub fn next_document_url(&self, base_url: &str) -> String {
        format!(
            "{}/eSCL/ScanJobs/{}/NextDocument",
            base_url.trim_end_matches('/'),
            self.job_id
        )
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_and_relative_location() {
        let absolute =
            JobHandle::from_location("http://10.0.0.5/eSCL/ScanJobs/7f3a-11ee").unwrap();
        let relative = JobHandle::from_location("/eSCL/ScanJobs/7f3a-11ee/").unwrap();

        assert_eq!(absolute.job_id(), "7f3a-11ee");
        assert_eq!(relative.job_id(), "7f3a-11ee");
        assert_eq!(
            absolute.next_document_url("http://10.0.0.5/"),
            "http://10.0.0.5/eSCL/ScanJobs/7f3a-11ee/NextDocument"
        );
        assert_eq!(
            absolute.next_document_url("http://10.0.0.5"),
            relative.next_document_url("http://10.0.0.5")
        );
    }

    #[test]
    fn test_invalid_location() {
        assert!(JobHandle::from_location("").is_none());
        assert!(JobHandle::from_location("http://10.0.0.5/eSCL/Jobs/1").is_none());
        assert!(JobHandle::from_location("/eSCL/ScanJobs/").is_none());
    }
}
