use std::path::{Path, PathBuf};

/// 扫描输出文件
///
/// 只在取回成功（200）并完整写入后才会创建。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    bytes: u64,
}

impl Artifact {
    pub fn new(path: PathBuf, bytes: u64) -> Self {
        Self { path, bytes }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 写入的字节数
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}
