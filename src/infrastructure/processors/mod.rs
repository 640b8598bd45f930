// Processors module
pub mod emitter;
pub mod rewriter;
pub mod scanner;

pub use emitter::*;
pub use rewriter::*;
pub use scanner::*;
