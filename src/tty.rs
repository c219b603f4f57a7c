//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection and status output.

use std::io::{self, IsTerminal, Read};

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

/// Read all of stdin, refusing to block on an interactive terminal.
pub fn read_stdin(field: &str) -> ue4util::Result<String> {
    if is_stdin_tty() {
        return Err(ue4util::Error::validation_invalid_argument(
            field,
            "Cannot read from stdin when stdin is a TTY",
            None,
            None,
        ));
    }

    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| ue4util::Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;
    Ok(buf)
}

/// Print status message to stderr if running in a terminal.
pub fn status(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{}", message);
    }
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.
