use crate::core::models::{default_extensions, BuildConfig, OutputConfig, DEFAULT_ENTRY_NAME, NAME_PLACEHOLDER};
use crate::core::pipeline::TransformRegistry;
use crate::utils::{Logger, Result, TinypackError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "tinypack.config.json";
const DEFAULT_ENTRY: &str = "./src/index.js";

/// Configuration file format (tinypack.config.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TinypackConfig {
    /// Root that module ids and relative paths are computed from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// A single entry path (named `main`) or an ordered name -> path map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve: Option<ResolveSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleSection>,

    /// Text used by the built-in `banner` loader
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryConfig {
    Single(String),
    Named(IndexMap<String, String>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleSection {
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// `{ "test": "\\.json$", "loader": "json" }` or `{ "test": "...", "use": ["a", "b"] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub test: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader: Option<String>,
    #[serde(rename = "use", default, skip_serializing_if = "Vec::is_empty")]
    pub use_loaders: Vec<String>,
}

impl RuleConfig {
    pub fn loader_names(&self) -> Vec<String> {
        match &self.loader {
            Some(loader) => vec![loader.clone()],
            None => self.use_loaders.clone(),
        }
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub context: Option<PathBuf>,
    pub entry: Option<String>,
    pub outdir: Option<String>,
    pub filename: Option<String>,
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Searches for tinypack.config.json in `root`
    pub fn find(root: &Path) -> Result<Option<TinypackConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.is_file() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Self::load_from_file(&config_path).map(Some)
    }

    pub fn load_from_file(config_path: &Path) -> Result<TinypackConfig> {
        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(config_path)
            .map_err(|e| TinypackError::io(config_path, e))?;

        Self::parse(&content).map_err(|e| {
            TinypackError::config(format!("failed to parse {}: {}", config_path.display(), e))
        })
    }

    pub fn parse(content: &str) -> Result<TinypackConfig> {
        Ok(serde_json::from_str(content)?)
    }

    /// Merge file config with CLI arguments (CLI > config file > defaults).
    ///
    /// `base_dir` anchors a relative `context` from the file, usually the
    /// directory holding the config file.
    pub fn merge_with_cli(
        file_config: Option<TinypackConfig>,
        overrides: CliOverrides,
        base_dir: &Path,
        registry: &TransformRegistry,
    ) -> Result<BuildConfig> {
        let base = file_config.unwrap_or_default();

        let context = match (overrides.context, base.context) {
            (Some(context), _) => context,
            (None, Some(context)) => base_dir.join(context),
            (None, None) => base_dir.to_path_buf(),
        };

        let entries: IndexMap<String, PathBuf> = match (overrides.entry, base.entry) {
            (Some(entry), _) => single_entry(&entry),
            (None, Some(EntryConfig::Single(entry))) => single_entry(&entry),
            (None, Some(EntryConfig::Named(map))) => map
                .into_iter()
                .map(|(name, path)| (name, PathBuf::from(path)))
                .collect(),
            (None, None) => single_entry(DEFAULT_ENTRY),
        };

        let output_section = base.output.unwrap_or_default();
        let defaults = OutputConfig::default();
        let output = OutputConfig {
            path: overrides
                .outdir
                .or(output_section.path)
                .map(PathBuf::from)
                .unwrap_or(defaults.path),
            filename: overrides
                .filename
                .or(output_section.filename)
                .unwrap_or(defaults.filename),
        };

        if entries.len() > 1 && !output.filename.contains(NAME_PLACEHOLDER) {
            Logger::warn(&format!(
                "output filename '{}' has no {} placeholder but {} entries are configured",
                output.filename,
                NAME_PLACEHOLDER,
                entries.len()
            ));
        }

        let extensions = base
            .resolve
            .and_then(|resolve| resolve.extensions)
            .unwrap_or_else(default_extensions);

        let rules = base
            .module
            .map(|module| module.rules)
            .unwrap_or_default()
            .iter()
            .map(|rule| registry.rule(&rule.test, &rule.loader_names()))
            .collect::<Result<Vec<_>>>()?;

        Ok(BuildConfig {
            context,
            entries,
            extensions,
            rules,
            output,
        })
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        let mut entries = IndexMap::new();
        entries.insert(DEFAULT_ENTRY_NAME.to_string(), DEFAULT_ENTRY.to_string());

        let example = TinypackConfig {
            context: Some(".".to_string()),
            entry: Some(EntryConfig::Named(entries)),
            output: Some(OutputSection {
                path: Some("dist".to_string()),
                filename: Some(format!("{}.js", NAME_PLACEHOLDER)),
            }),
            resolve: Some(ResolveSection {
                extensions: Some(default_extensions()),
            }),
            module: Some(ModuleSection {
                rules: vec![RuleConfig {
                    test: r"\.json$".to_string(),
                    loader: Some("json".to_string()),
                    use_loaders: Vec::new(),
                }],
            }),
            banner: None,
        };

        serde_json::to_string_pretty(&example).unwrap_or_default()
    }
}

fn single_entry(path: &str) -> IndexMap<String, PathBuf> {
    let mut entries = IndexMap::new();
    entries.insert(DEFAULT_ENTRY_NAME.to_string(), PathBuf::from(path));
    entries
}
