// Banner loader: prepends a comment banner to module sources

use crate::core::interfaces::Transform;

/// Loader that adds a banner comment to the top of each matching module
///
/// # Example
/// ```
/// use tinypack::core::TransformRule;
/// use tinypack::plugins::BannerTransform;
/// use regex::Regex;
/// use std::sync::Arc;
///
/// let rule = TransformRule::new(
///     Regex::new(r"\.js$").unwrap(),
///     Arc::new(BannerTransform::new("/*! MyApp v1.0.0 */")),
/// );
/// ```
pub struct BannerTransform {
    banner: String,
}

impl BannerTransform {
    pub const NAME: &'static str = "banner";

    pub fn new(banner: impl Into<String>) -> Self {
        Self {
            banner: banner.into(),
        }
    }
}

impl Transform for BannerTransform {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn transform(&self, source: &str) -> anyhow::Result<String> {
        if self.banner.is_empty() {
            return Ok(source.to_string());
        }
        Ok(format!("{}\n{}", self.banner, source))
    }
}
