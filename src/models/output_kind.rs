use crate::error::{ScanError, ScanResult};

/// 输出格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// 文档 (PDF)
    Document,
    /// 无损图片 (PNG)
    ImageLossless,
    /// 有损图片 (JPEG)
    ImageLossy,
}

impl OutputKind {
    /// 全部支持的输出格式
    pub const ALL: [OutputKind; 3] = [
        OutputKind::Document,
        OutputKind::ImageLossless,
        OutputKind::ImageLossy,
    ];

    /// 获取 eSCL 使用的 MIME 类型
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputKind::Document => "application/pdf",
            OutputKind::ImageLossless => "image/png",
            OutputKind::ImageLossy => "image/jpeg",
        }
    }

    /// 获取默认文件扩展名（带点）
    pub fn extension(self) -> &'static str {
        match self {
            OutputKind::Document => ".pdf",
            OutputKind::ImageLossless => ".png",
            OutputKind::ImageLossy => ".jpg",
        }
    }

    /// 从文件扩展名解析输出格式
    ///
    /// 接受带点或不带点的写法，大小写不敏感。
    pub fn from_extension(ext: &str) -> ScanResult<Self> {
        let normalized = ext.trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(OutputKind::Document),
            "png" => Ok(OutputKind::ImageLossless),
            "jpg" | "jpeg" => Ok(OutputKind::ImageLossy),
            _ => Err(ScanError::UnsupportedFormat(ext.to_string())),
        }
    }
}

impl Default for OutputKind {
    fn default() -> Self {
        OutputKind::Document
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mime_type())
    }
}
