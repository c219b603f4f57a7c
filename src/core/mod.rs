// Public modules
pub mod config;
pub mod defaults;
pub mod error;
pub mod runner;

// Internal modules - not part of public API
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use runner::{CommandResult, ProcessRunner, RunOptions};
