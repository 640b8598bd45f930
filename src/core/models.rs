use crate::core::pipeline::TransformRule;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_ENTRY_NAME: &str = "main";
pub const NAME_PLACEHOLDER: &str = "[name]";

/// One physical source file after transformation and rewriting
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub absolute_path: PathBuf,
    pub source: String,
    pub dependencies: IndexSet<String>,
    pub owning_entries: IndexSet<String>,
}

impl Module {
    pub fn is_leaf(&self) -> bool {
        self.dependencies.is_empty()
    }

    pub fn is_owned_by(&self, entry_name: &str) -> bool {
        self.owning_entries.contains(entry_name)
    }
}

/// A named root module after graph building
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    pub module_id: String,
}

/// Output unit: one per entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub name: String,
    pub entry_module: Module,
    pub modules: Vec<Module>,
}

impl Chunk {
    pub fn module_ids(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.id.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// File name template, `[name]` is replaced by the chunk name
    pub filename: String,
}

impl OutputConfig {
    pub fn filename_for(&self, chunk_name: &str) -> String {
        self.filename.replace(NAME_PLACEHOLDER, chunk_name)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dist"),
            filename: format!("{}.js", NAME_PLACEHOLDER),
        }
    }
}

/// Fully resolved build configuration
#[derive(Clone)]
pub struct BuildConfig {
    pub context: PathBuf,
    /// Entry name -> path, in configuration order
    pub entries: IndexMap<String, PathBuf>,
    pub extensions: Vec<String>,
    pub rules: Vec<TransformRule>,
    pub output: OutputConfig,
}

impl BuildConfig {
    pub fn new(context: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            entries: IndexMap::new(),
            extensions: default_extensions(),
            rules: Vec::new(),
            output: OutputConfig::default(),
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(name.into(), path.into());
        self
    }

    pub fn with_rule(mut self, rule: TransformRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        self.output = OutputConfig {
            path: path.into(),
            filename: filename.into(),
        };
        self
    }
}

impl std::fmt::Debug for BuildConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildConfig")
            .field("context", &self.context)
            .field("entries", &self.entries)
            .field("extensions", &self.extensions)
            .field("rules", &self.rules.len())
            .field("output", &self.output)
            .finish()
    }
}

pub fn default_extensions() -> Vec<String> {
    vec![".js".to_string(), ".json".to_string()]
}

/// Everything a build produced, for callers and tooling
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub entries: Vec<Entry>,
    pub modules: Vec<Module>,
    pub files: Vec<String>,
    pub assets: IndexMap<String, String>,
    pub chunks: Vec<Chunk>,
}

impl BuildReport {
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    pub fn chunk(&self, name: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.name == name)
    }

    pub fn to_json(&self) -> crate::utils::Result<String> {
        serde_json::to_string_pretty(self).map_err(crate::utils::TinypackError::report)
    }
}
