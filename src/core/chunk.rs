use crate::core::graph::ModuleGraph;
use crate::core::models::{Chunk, Module};

/// Groups modules into one chunk per entry.
pub struct ChunkAssembler;

impl ChunkAssembler {
    /// Modules keep graph insertion order, so output is reproducible.
    pub fn assemble(&self, entry_name: &str, entry_module: &Module, graph: &ModuleGraph) -> Chunk {
        let modules = graph
            .modules()
            .filter(|module| module.is_owned_by(entry_name))
            .cloned()
            .collect();

        Chunk {
            name: entry_name.to_string(),
            entry_module: entry_module.clone(),
            modules,
        }
    }
}
