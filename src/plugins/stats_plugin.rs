// Stats Plugin: Logs build phase timings

use crate::core::plugin::{CompilerHooks, Plugin};
use crate::utils::Logger;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct StatsState {
    started: Option<Instant>,
    phases: Vec<(&'static str, Duration)>,
    logged: Vec<&'static str>,
}

/// Plugin that tracks how long generation and write-out take
///
/// # Example
/// ```
/// use tinypack::core::{BuildConfig, Compiler};
/// use tinypack::infrastructure::TokioFileSystemService;
/// use tinypack::plugins::StatsPlugin;
/// use std::sync::Arc;
///
/// let config = BuildConfig::new(".").with_entry("main", "src/index.js");
/// let compiler = Compiler::new(config, Arc::new(TokioFileSystemService))
///     .with_plugin(Arc::new(StatsPlugin::new(true)));
/// ```
pub struct StatsPlugin {
    verbose: bool,
    state: Arc<Mutex<StatsState>>,
}

impl StatsPlugin {
    /// * `verbose` - If true, logs every phase as it finishes
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            state: Arc::new(Mutex::new(StatsState::default())),
        }
    }

    /// Recorded phases (`generate`, `write`) with elapsed time since `run`
    pub fn phases(&self) -> Vec<(&'static str, Duration)> {
        self.state
            .lock()
            .map(|state| state.phases.clone())
            .unwrap_or_default()
    }

    fn record(state: &Mutex<StatsState>, phase: &'static str, verbose: bool) {
        if let Ok(mut state) = state.lock() {
            if let Some(started) = state.started {
                let elapsed = started.elapsed();
                state.phases.push((phase, elapsed));
                if verbose {
                    state.logged.push(phase);
                    Logger::info(&format!("📊 Stats: {} finished after {:.2?}", phase, elapsed));
                }
            }
        }
    }
}

impl Plugin for StatsPlugin {
    fn name(&self) -> &str {
        "stats-plugin"
    }

    fn apply(&self, hooks: &mut CompilerHooks) {
        let state = self.state.clone();
        hooks.run.tap(self.name(), move || {
            if let Ok(mut state) = state.lock() {
                state.started = Some(Instant::now());
                state.phases.clear();
                state.logged.clear();
            }
        });

        let state = self.state.clone();
        let verbose = self.verbose;
        hooks.emit.tap(self.name(), move || {
            StatsPlugin::record(&state, "generate", verbose);
        });

        let state = self.state.clone();
        let verbose = self.verbose;
        hooks.done.tap(self.name(), move || {
            StatsPlugin::record(&state, "write", verbose);
        });
    }
}
