//! Generic utility primitives with zero domain knowledge.
//!
//! - `args` - Argument prefix/value extraction and blacklist filtering
//! - `io` - File I/O and in-place patching with consistent error handling
//! - `shell` - Shell escaping, quoting, joining and path separators

pub mod args;
pub mod io;
pub mod shell;
