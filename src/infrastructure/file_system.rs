use crate::core::interfaces::FileSystemService;
use crate::utils::{Result, TinypackError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::fs;

pub struct TokioFileSystemService;

#[async_trait::async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await
            .map_err(|e| TinypackError::io(path, e))
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !self.dir_exists(parent) {
                self.create_directory(parent).await?;
            }
        }

        fs::write(path, content).await
            .map_err(|e| TinypackError::io(path, e))
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await
            .map_err(|e| TinypackError::io(path, e))
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory file system. Writes are recorded so callers can inspect output.
#[derive(Default)]
pub struct MemoryFileSystemService {
    files: RwLock<BTreeMap<PathBuf, String>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
}

impl MemoryFileSystemService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), content.into());
        }
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.read().ok()?.get(path).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.read().map(|f| f.len()).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl FileSystemService for MemoryFileSystemService {
    async fn read_file(&self, path: &Path) -> Result<String> {
        self.get(path).ok_or_else(|| {
            TinypackError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.insert(path, content);
        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        if let Ok(mut dirs) = self.dirs.write() {
            dirs.insert(path.to_path_buf());
        }
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.read().map(|f| f.contains_key(path)).unwrap_or(false)
    }

    fn dir_exists(&self, path: &Path) -> bool {
        if self.dirs.read().map(|d| d.contains(path)).unwrap_or(false) {
            return true;
        }
        self.files
            .read()
            .map(|f| f.keys().any(|file| file.starts_with(path) && file != path))
            .unwrap_or(false)
    }
}
