pub type CmdResult<T> = ue4util::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// Parse a `KEY=VALUE` pair (used by `--env` and `--replace`).
///
/// Only the first `=` separates, so the value may itself contain `=`.
pub(crate) fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }

    Ok((key.to_string(), value.to_string()))
}

pub mod args;
pub mod config;
pub mod exec;
pub mod file;
pub mod text;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (ue4util::Result<serde_json::Value>, i32) {
    crate::tty::status("ue4util is working...");

    match command {
        crate::Commands::Capture(args) => {
            crate::output::map_cmd_result_to_json(exec::capture(args, global))
        }
        crate::Commands::File(args) => dispatch!(args, global, file),
        crate::Commands::Args(args) => dispatch!(args, global, args),
        crate::Commands::Text(args) => dispatch!(args, global, text),
        crate::Commands::Config(args) => dispatch!(args, global, config),

        // Passthrough commands never produce a JSON envelope
        crate::Commands::Run(_) => {
            let err = ue4util::Error::validation_invalid_argument(
                "output_mode",
                "Run command uses passthrough output mode",
                None,
                None,
            );
            crate::output::map_cmd_result_to_json::<serde_json::Value>(Err(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("UE_FLAGS=-a=b").unwrap(),
            ("UE_FLAGS".to_string(), "-a=b".to_string())
        );
        assert_eq!(
            parse_key_val("EMPTY=").unwrap(),
            ("EMPTY".to_string(), String::new())
        );
    }

    #[test]
    fn parse_key_val_rejects_missing_separator_or_key() {
        assert!(parse_key_val("NOVALUE").is_err());
        assert!(parse_key_val("=value").is_err());
    }
}
