use crate::core::interfaces::FileSystemService;
use crate::core::models::Module;
use crate::core::pipeline::TransformPipeline;
use crate::core::resolver::PathResolver;
use crate::infrastructure::processors::{DependencyScanner, RewritePlan};
use crate::utils::{path::module_id, Logger, Result};
use indexmap::{IndexMap, IndexSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The module set of one build, keyed by module id in discovery order.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    modules: IndexMap<String, Module>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn into_modules(self) -> Vec<Module> {
        self.modules.into_values().collect()
    }

    fn insert(&mut self, module: Module) {
        self.modules.insert(module.id.clone(), module);
    }

    /// Mark `id` and everything reachable from it as owned by `entry`.
    /// Stops at modules already carrying the entry, which also ends cycles.
    fn claim(&mut self, id: &str, entry: &str) {
        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(module) = self.modules.get_mut(&current) {
                if module.owning_entries.insert(entry.to_string()) {
                    pending.extend(module.dependencies.iter().cloned());
                }
            }
        }
    }
}

/// Reads, transforms, scans and rewrites modules reachable from an entry,
/// registering each physical file in the graph exactly once.
pub struct ModuleGraphBuilder<'g> {
    root: PathBuf,
    fs: Arc<dyn FileSystemService>,
    resolver: &'g PathResolver,
    pipeline: &'g TransformPipeline,
    scanner: &'g DependencyScanner,
    graph: &'g mut ModuleGraph,
}

impl<'g> ModuleGraphBuilder<'g> {
    pub fn new(
        root: &Path,
        fs: Arc<dyn FileSystemService>,
        resolver: &'g PathResolver,
        pipeline: &'g TransformPipeline,
        scanner: &'g DependencyScanner,
        graph: &'g mut ModuleGraph,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            fs,
            resolver,
            pipeline,
            scanner,
            graph,
        }
    }

    /// Builds the module at `path` and its dependencies; returns its id.
    pub async fn build(&mut self, entry_name: &str, path: &Path) -> Result<String> {
        let id = module_id(&self.root, path);

        if self.graph.contains(&id) {
            Logger::module_reused(&id, entry_name);
            self.graph.claim(&id, entry_name);
            return Ok(id);
        }

        let raw = self.fs.read_file(path).await?;
        let code = self.pipeline.apply(raw, path)?;
        let scanned = self.scanner.scan_module(&code, path)?;

        let directory = path.parent().unwrap_or(self.root.as_path()).to_path_buf();
        let mut plan = RewritePlan::new();
        if let Some(hashbang) = scanned.hashbang {
            plan.comment_out_hashbang(hashbang);
        }
        let mut dependencies = IndexSet::new();
        let mut pending = Vec::new();

        for call in &scanned.calls {
            let dependency_path = self.resolver.resolve(&call.specifier, &directory)?;
            let dependency_id = module_id(&self.root, &dependency_path);
            plan.redirect(call, &dependency_id);
            if dependencies.insert(dependency_id) {
                pending.push(dependency_path);
            }
        }

        Logger::module_built(&id, dependencies.len());

        // Registered before descending so a cycle finds it instead of recursing.
        self.graph.insert(Module {
            id: id.clone(),
            absolute_path: path.to_path_buf(),
            source: plan.apply(&code),
            dependencies,
            owning_entries: IndexSet::from([entry_name.to_string()]),
        });

        for dependency_path in pending {
            Box::pin(self.build(entry_name, &dependency_path)).await?;
        }

        Ok(id)
    }
}
