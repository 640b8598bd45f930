// Shared utilities module
pub mod config_loader;
pub mod errors;
pub mod logging;
pub mod path;

pub use config_loader::*;
pub use errors::*;
pub use logging::*;
