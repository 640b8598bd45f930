use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<String>;
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
    /// True only for regular files; directories never satisfy a module probe.
    fn file_exists(&self, path: &Path) -> bool;
    fn dir_exists(&self, path: &Path) -> bool;
}

/// A `text -> text` step applied to module sources before scanning
pub trait Transform: Send + Sync {
    fn name(&self) -> &str;
    fn transform(&self, source: &str) -> anyhow::Result<String>;
}
