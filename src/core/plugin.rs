// Lifecycle hooks and plugins
// External observers subscribe to the three fixed points of a build.

use std::fmt;
use std::sync::Arc;

type Callback = Box<dyn Fn() + Send + Sync>;

/// An ordered list of named zero-argument callbacks
#[derive(Default)]
pub struct LifecycleHook {
    taps: Vec<(String, Callback)>,
}

impl LifecycleHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback; callbacks run in registration order.
    pub fn tap<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.taps.push((name.into(), Box::new(callback)));
    }

    pub fn call(&self) {
        for (_, callback) in &self.taps {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.taps.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// The three observable points of a build
#[derive(Debug, Default)]
pub struct CompilerHooks {
    /// Before graph building begins
    pub run: LifecycleHook,
    /// After every asset is generated, before write-out
    pub emit: LifecycleHook,
    /// After write-out completes
    pub done: LifecycleHook,
}

/// Plugins wire themselves into the hooks once, when registered.
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin
    fn name(&self) -> &str;

    fn apply(&self, hooks: &mut CompilerHooks);
}

/// Keeps registered plugins alive and applies them to the hooks
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Arc<dyn Plugin>, hooks: &mut CompilerHooks) {
        plugin.apply(hooks);
        self.plugins.push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}
