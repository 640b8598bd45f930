//! tinypack builds CommonJS module graphs from one or more entries and emits
//! one self-contained bundle per entry, each carrying its own module
//! registry, instance cache and `require`-style loader.

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod plugins;
pub mod utils;

pub use crate::core::{BuildConfig, BuildReport, Compiler};
pub use crate::utils::{Result, TinypackError};
