use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every failure aborts the whole build; there are no soft errors.
#[derive(Error, Debug)]
pub enum TinypackError {
    #[error("Can't resolve '{specifier}' in '{}'", .directory.display())]
    Resolution {
        specifier: String,
        directory: PathBuf,
    },

    #[error("Parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Transform '{rule}' failed on {}: {message}", .path.display())]
    Transform {
        path: PathBuf,
        rule: String,
        message: String,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize build report: {0}")]
    Report(String),
}

impl TinypackError {
    pub fn resolution(specifier: impl Into<String>, directory: &Path) -> Self {
        Self::Resolution {
            specifier: specifier.into(),
            directory: directory.to_path_buf(),
        }
    }

    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn report(err: serde_json::Error) -> Self {
        Self::Report(err.to_string())
    }

    /// Path of the file the failure is attached to, if any
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            TinypackError::Resolution { directory, .. } => Some(directory),
            TinypackError::Parse { path, .. }
            | TinypackError::Transform { path, .. }
            | TinypackError::Io { path, .. } => Some(path),
            TinypackError::Config(_) | TinypackError::Report(_) => None,
        }
    }

    /// Format error with enhanced context display
    pub fn format_detailed(&self) -> String {
        let kind = match self {
            TinypackError::Resolution { .. } => "Resolution Error",
            TinypackError::Parse { .. } => "Parse Error",
            TinypackError::Transform { .. } => "Transform Error",
            TinypackError::Io { .. } => "IO Error",
            TinypackError::Config(_) => "Configuration Error",
            TinypackError::Report(_) => "Report Error",
        };

        let mut output = format!("❌ {}: {}", kind, self);

        match self {
            TinypackError::Resolution { directory, .. } => {
                output.push_str(&format!("\n📁 Searched in: {}", directory.display()));
            }
            TinypackError::Transform { rule, .. } => {
                output.push_str(&format!("\n🔧 Rule: {}", rule));
            }
            _ => {}
        }

        if let Some(path) = self.file_path() {
            if !matches!(self, TinypackError::Resolution { .. }) {
                output.push_str(&format!("\n📁 File: {}", path.display()));
            }
        }

        output
    }
}

pub type Result<T> = std::result::Result<T, TinypackError>;

impl From<regex::Error> for TinypackError {
    fn from(err: regex::Error) -> Self {
        TinypackError::config(format!("Invalid rule pattern: {}", err))
    }
}

impl From<serde_json::Error> for TinypackError {
    fn from(err: serde_json::Error) -> Self {
        TinypackError::config(format!("Invalid config file: {}", err))
    }
}
