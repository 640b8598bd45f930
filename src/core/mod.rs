// Core domain layer
pub mod chunk;
pub mod compiler;
pub mod graph;
pub mod interfaces;
pub mod models;
pub mod pipeline;
pub mod plugin;
pub mod resolver;

pub use chunk::*;
pub use compiler::*;
pub use graph::*;
pub use interfaces::*;
pub use models::*;
pub use pipeline::*;
pub use plugin::*;
pub use resolver::*;
