use crate::core::chunk::ChunkAssembler;
use crate::core::graph::{ModuleGraph, ModuleGraphBuilder};
use crate::core::interfaces::FileSystemService;
use crate::core::models::{BuildConfig, BuildReport, Entry};
use crate::core::pipeline::TransformPipeline;
use crate::core::plugin::{CompilerHooks, Plugin, PluginManager};
use crate::core::resolver::PathResolver;
use crate::infrastructure::processors::{BundleEmitter, DependencyScanner};
use crate::utils::{path::normalize, Logger, Result, Timer, TinypackError};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Drives a build: entries -> module graph -> chunks -> assets -> write-out.
///
/// Each call to [`Compiler::compile`] or [`Compiler::run`] owns a fresh
/// module graph, so one compiler can build repeatedly and several
/// compilers can run side by side.
pub struct Compiler {
    config: BuildConfig,
    fs: Arc<dyn FileSystemService>,
    hooks: CompilerHooks,
    plugin_manager: PluginManager,
}

impl Compiler {
    pub fn new(config: BuildConfig, fs: Arc<dyn FileSystemService>) -> Self {
        Self {
            config,
            fs,
            hooks: CompilerHooks::default(),
            plugin_manager: PluginManager::new(),
        }
    }

    /// Register a plugin with the compiler
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugin_manager.register(plugin, &mut self.hooks);
        self
    }

    pub fn hooks_mut(&mut self) -> &mut CompilerHooks {
        &mut self.hooks
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Absolute, normalized context directory
    pub fn context(&self) -> Result<PathBuf> {
        absolutize(&self.config.context)
    }

    /// Entry names with absolute paths, in configuration order
    pub fn resolve_entries(&self) -> Result<Vec<(String, PathBuf)>> {
        let context = self.context()?;
        Ok(self
            .config
            .entries
            .iter()
            .map(|(name, path)| (name.clone(), normalize(&context.join(path))))
            .collect())
    }

    /// Full build with lifecycle notifications and write-out.
    /// Nothing is written unless every module and chunk succeeded.
    pub async fn run(&self) -> Result<BuildReport> {
        let started = Instant::now();
        self.hooks.run.call();

        let report = self.compile().await?;

        self.hooks.emit.call();
        self.write_assets(&report).await?;
        self.hooks.done.call();

        Logger::build_complete(report.modules.len(), &report.files, started.elapsed());
        Ok(report)
    }

    /// Builds the graph and generates every asset without touching the output directory.
    pub async fn compile(&self) -> Result<BuildReport> {
        let context = self.context()?;
        let entries = self.resolve_entries()?;
        if entries.is_empty() {
            return Err(TinypackError::config("no entry configured"));
        }
        Logger::build_start(&context.display().to_string(), entries.len());

        let resolver = PathResolver::new(self.fs.clone(), &self.config.extensions);
        let pipeline = TransformPipeline::new(self.config.rules.clone());
        let scanner = DependencyScanner::new();
        let mut graph = ModuleGraph::new();
        let mut built_entries = Vec::with_capacity(entries.len());

        {
            let _timer = Timer::start("Building module graph");
            for (name, path) in &entries {
                let mut builder = ModuleGraphBuilder::new(
                    &context,
                    self.fs.clone(),
                    &resolver,
                    &pipeline,
                    &scanner,
                    &mut graph,
                );
                let module_id = builder.build(name, path).await?;
                built_entries.push(Entry {
                    name: name.clone(),
                    module_id,
                });
            }
        }

        let assembler = ChunkAssembler;
        let chunks: Vec<_> = built_entries
            .iter()
            .filter_map(|entry| {
                graph
                    .get(&entry.module_id)
                    .map(|module| assembler.assemble(&entry.name, module, &graph))
            })
            .collect();

        let emitter = BundleEmitter::new();
        let mut assets = IndexMap::new();
        for chunk in &chunks {
            let filename = self.config.output.filename_for(&chunk.name);
            if assets.contains_key(&filename) {
                return Err(TinypackError::config(format!(
                    "multiple chunks would be written to '{}'; add a [name] placeholder to the output filename",
                    filename
                )));
            }
            let code = emitter.emit(chunk);
            Logger::chunk_emitted(&filename, chunk.modules.len(), code.len());
            assets.insert(filename, code);
        }

        Ok(BuildReport {
            entries: built_entries,
            files: assets.keys().cloned().collect(),
            assets,
            chunks,
            modules: graph.into_modules(),
        })
    }

    /// Absolute output directory
    pub fn output_dir(&self) -> Result<PathBuf> {
        Ok(normalize(&self.context()?.join(&self.config.output.path)))
    }

    async fn write_assets(&self, report: &BuildReport) -> Result<()> {
        let _timer = Timer::start("Writing output files");
        let output_dir = self.output_dir()?;

        if !self.fs.dir_exists(&output_dir) {
            self.fs.create_directory(&output_dir).await?;
        }

        for (filename, code) in &report.assets {
            self.fs.write_file(&output_dir.join(filename), code).await?;
        }
        Ok(())
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let cwd = std::env::current_dir().map_err(|e| TinypackError::io(path, e))?;
    Ok(normalize(&cwd.join(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryFileSystemService;
    use std::sync::Mutex;

    fn two_entry_fs() -> MemoryFileSystemService {
        MemoryFileSystemService::new()
            .with_file("/app/src/a.js", "const util = require('./util');\nutil.hello('a');")
            .with_file("/app/src/b.js", "const util = require('./util');\nutil.hello('b');")
            .with_file("/app/src/util.js", "exports.hello = (who) => console.log(who);")
    }

    fn two_entry_config() -> BuildConfig {
        BuildConfig::new("/app")
            .with_entry("a", "src/a.js")
            .with_entry("b", "./src/b.js")
            .with_output("dist", "[name].js")
    }

    #[tokio::test]
    async fn test_compile_two_entries_with_shared_module() {
        let fs = Arc::new(two_entry_fs());
        let compiler = Compiler::new(two_entry_config(), fs.clone());

        let report = compiler.compile().await.unwrap();

        assert_eq!(report.modules.len(), 3);
        let util = report.module("./src/util.js").unwrap();
        assert_eq!(util.owning_entries.iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(report.files, vec!["a.js", "b.js"]);
        assert!(report.chunk("a").unwrap().module_ids().any(|id| id == "./src/util.js"));
        assert!(report.chunk("b").unwrap().module_ids().any(|id| id == "./src/util.js"));
        assert_eq!(report.entries[1].module_id, "./src/b.js");
        // compile never writes
        assert_eq!(fs.file_count(), 3);
    }

    #[tokio::test]
    async fn test_run_writes_assets_and_fires_hooks_in_order() {
        let fs = Arc::new(two_entry_fs());
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut compiler = Compiler::new(two_entry_config(), fs.clone());

        {
            let hooks = compiler.hooks_mut();
            let e = events.clone();
            hooks.run.tap("test", move || e.lock().unwrap().push("run"));
            let e = events.clone();
            hooks.emit.tap("test", move || e.lock().unwrap().push("emit"));
            let e = events.clone();
            hooks.done.tap("test", move || e.lock().unwrap().push("done"));
        }

        let report = compiler.run().await.unwrap();

        assert_eq!(*events.lock().unwrap(), vec!["run", "emit", "done"]);
        let written = fs.get(Path::new("/app/dist/a.js")).unwrap();
        assert_eq!(&written, report.assets.get("a.js").unwrap());
        assert!(fs.get(Path::new("/app/dist/b.js")).is_some());
    }

    #[tokio::test]
    async fn test_failed_build_writes_nothing() {
        let fs = Arc::new(
            MemoryFileSystemService::new().with_file("/app/main.js", "require('./missing');"),
        );
        let config = BuildConfig::new("/app").with_entry("main", "main.js");
        let emitted = Arc::new(Mutex::new(false));
        let mut compiler = Compiler::new(config, fs.clone());
        let flag = emitted.clone();
        compiler.hooks_mut().emit.tap("test", move || *flag.lock().unwrap() = true);

        let err = compiler.run().await.unwrap_err();

        assert!(matches!(err, TinypackError::Resolution { .. }));
        assert!(!*emitted.lock().unwrap());
        assert_eq!(fs.file_count(), 1);
    }

    #[tokio::test]
    async fn test_shared_filename_is_rejected() {
        let fs = Arc::new(two_entry_fs());
        let config = two_entry_config().with_output("dist", "bundle.js");

        let err = Compiler::new(config, fs).compile().await.unwrap_err();
        assert!(matches!(err, TinypackError::Config(_)));
    }

    #[tokio::test]
    async fn test_no_entries_is_config_error() {
        let fs = Arc::new(MemoryFileSystemService::new());
        let err = Compiler::new(BuildConfig::new("/app"), fs).compile().await.unwrap_err();
        assert!(matches!(err, TinypackError::Config(_)));
    }

    #[tokio::test]
    async fn test_compile_is_deterministic() {
        let fs = Arc::new(two_entry_fs());
        let compiler = Compiler::new(two_entry_config(), fs);

        let first = compiler.compile().await.unwrap();
        let second = compiler.compile().await.unwrap();
        assert_eq!(first.assets, second.assets);
    }
}
