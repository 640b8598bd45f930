// Transform pipeline: pattern-matched source-to-source loaders

use crate::core::interfaces::Transform;
use crate::utils::{path::to_unix_path, Result, TinypackError};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A path pattern plus the transforms it applies, in configured order
#[derive(Clone)]
pub struct TransformRule {
    pub test: Regex,
    pub transforms: Vec<Arc<dyn Transform>>,
}

impl TransformRule {
    pub fn new(test: Regex, transform: Arc<dyn Transform>) -> Self {
        Self {
            test,
            transforms: vec![transform],
        }
    }

    pub fn with_transforms(test: Regex, transforms: Vec<Arc<dyn Transform>>) -> Self {
        Self { test, transforms }
    }

    pub fn matches(&self, module_path: &Path) -> bool {
        self.test.is_match(&to_unix_path(module_path))
    }
}

/// Wraps a closure as a named transform
pub struct FnTransform<F> {
    name: String,
    func: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, source: &str) -> anyhow::Result<String> {
        (self.func)(source)
    }
}

/// Named transforms that configuration files can refer to
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, transform: Arc<dyn Transform>) {
        self.transforms.insert(transform.name().to_string(), transform);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Transform>> {
        self.transforms.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Build a rule from a pattern and loader names, failing on unknown names
    pub fn rule(&self, test: &str, loaders: &[String]) -> Result<TransformRule> {
        if loaders.is_empty() {
            return Err(TinypackError::config(format!("rule '{}' names no loader", test)));
        }

        let transforms = loaders
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| TinypackError::config(format!("unknown loader '{}'", name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TransformRule::with_transforms(Regex::new(test)?, transforms))
    }
}

pub struct TransformPipeline {
    rules: Vec<TransformRule>,
}

impl TransformPipeline {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Transforms whose rule matches, in configuration order
    pub fn matching(&self, module_path: &Path) -> Vec<&Arc<dyn Transform>> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(module_path))
            .flat_map(|rule| rule.transforms.iter())
            .collect()
    }

    /// Applies matching transforms right-to-left: the last configured runs first.
    pub fn apply(&self, source: String, module_path: &Path) -> Result<String> {
        let mut code = source;
        for transform in self.matching(module_path).into_iter().rev() {
            code = transform
                .transform(&code)
                .map_err(|e| TinypackError::Transform {
                    path: module_path.to_path_buf(),
                    rule: transform.name().to_string(),
                    message: format!("{:#}", e),
                })?;
        }
        Ok(code)
    }
}
