// Built-in loaders and plugins for tinypack

pub mod banner_plugin;
pub mod json_loader;
pub mod stats_plugin;

pub use banner_plugin::BannerTransform;
pub use json_loader::JsonTransform;
pub use stats_plugin::StatsPlugin;

use crate::core::pipeline::TransformRegistry;
use std::sync::Arc;

/// Registry with every built-in loader; `banner` uses the given text.
pub fn builtin_registry(banner: Option<&str>) -> TransformRegistry {
    let mut registry = TransformRegistry::new();
    registry.register(Arc::new(JsonTransform));
    registry.register(Arc::new(BannerTransform::new(banner.unwrap_or_default())));
    registry
}
