use crate::core::interfaces::FileSystemService;
use crate::utils::{path::normalize, Result, TinypackError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Maps a `require` specifier to an existing file.
///
/// The bare specifier is always probed first, then each configured
/// extension is appended in configured order.
pub struct PathResolver {
    fs: Arc<dyn FileSystemService>,
    extensions: Vec<String>,
}

impl PathResolver {
    pub fn new(fs: Arc<dyn FileSystemService>, extensions: &[String]) -> Self {
        let mut probes = vec![String::new()];
        for ext in extensions {
            if !ext.is_empty() && !probes.contains(ext) {
                probes.push(ext.clone());
            }
        }

        Self {
            fs,
            extensions: probes,
        }
    }

    /// Extension probes in the order they are attempted, `""` first
    pub fn probes(&self) -> &[String] {
        &self.extensions
    }

    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> Result<PathBuf> {
        let candidate = normalize(&from_dir.join(specifier));

        for ext in &self.extensions {
            let probe = append_extension(&candidate, ext);
            trace!("probing {}", probe.display());
            if self.fs.file_exists(&probe) {
                return Ok(probe);
            }
        }

        Err(TinypackError::resolution(specifier, from_dir))
    }
}

// `with_extension` would replace an existing suffix (`a.min` -> `a.js`); we append.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    if ext.is_empty() {
        return path.to_path_buf();
    }
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(ext);
    PathBuf::from(raw)
}
