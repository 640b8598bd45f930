use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use std::time::Instant;

pub struct Logger;

impl Logger {
    /// Installs the global subscriber. `RUST_LOG` wins over the default filter.
    pub fn init() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tinypack=info"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn build_start(context: &str, entries: usize) {
        info!("📦 tinypack build");
        info!("📁 Context: {}", context);
        info!("🎯 Entries: {}", entries);
    }

    pub fn module_built(id: &str, dependencies: usize) {
        debug!("🔍 Built module {} ({} dependencies)", id, dependencies);
    }

    pub fn module_reused(id: &str, entry: &str) {
        debug!("♻️  Reusing module {} for entry {}", id, entry);
    }

    pub fn chunk_emitted(filename: &str, modules: usize, size: usize) {
        debug!("📝 Emitted {} ({} modules, {} bytes)", filename, modules, size);
    }

    pub fn build_complete(modules: usize, files: &[String], build_time: std::time::Duration) {
        info!("📊 Modules: {}", modules);
        for file in files {
            info!("  • {}", file);
        }
        info!("✅ Build completed in {:.2?}", build_time);
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
