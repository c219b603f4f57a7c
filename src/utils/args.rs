//! Argument filtering utilities.
//!
//! Helpers for picking apart pass-through argument lists in the
//! `-KEY=VALUE` style used by the engine's build tools. Matching is
//! case-insensitive; the returned arguments keep their original spelling.

use crate::error::{Error, Result};

/// Extract the arguments that start with any of the given prefixes.
pub fn find_args<A: AsRef<str>, P: AsRef<str>>(args: &[A], prefixes: &[P]) -> Vec<String> {
    let prefixes: Vec<String> = prefixes.iter().map(|p| p.as_ref().to_lowercase()).collect();

    args.iter()
        .map(AsRef::as_ref)
        .filter(|arg| {
            let lowered = arg.to_lowercase();
            prefixes.iter().any(|p| lowered.starts_with(p.as_str()))
        })
        .map(str::to_string)
        .collect()
}

/// Return the value part of an argument with the format `-KEY=VALUE`.
///
/// Only the first `=` separates key from value, so `-define=A=B` yields `A=B`.
pub fn get_arg_value(arg: &str) -> Result<&str> {
    arg.split_once('=').map(|(_, value)| value).ok_or_else(|| {
        Error::validation_invalid_argument(
            "arg",
            "Argument has no '=' separated value",
            Some(arg.to_string()),
            None,
        )
    })
}

/// Remove every argument that matches an entry of the blacklist.
pub fn strip_args<A: AsRef<str>, B: AsRef<str>>(args: &[A], blacklist: &[B]) -> Vec<String> {
    let blacklist: Vec<String> = blacklist.iter().map(|b| b.as_ref().to_lowercase()).collect();

    args.iter()
        .map(AsRef::as_ref)
        .filter(|arg| !blacklist.contains(&arg.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn find_args_matches_prefixes_case_insensitively() {
        let args = ["-Target=Editor", "-platform=Linux", "-Verbose", "Development"];
        let found = find_args(&args, &["-target=", "-PLATFORM="]);
        assert_eq!(found, vec!["-Target=Editor", "-platform=Linux"]);
    }

    #[test]
    fn find_args_preserves_order() {
        let args = ["-b=2", "-a=1", "-b=3"];
        assert_eq!(find_args(&args, &["-a", "-b"]), vec!["-b=2", "-a=1", "-b=3"]);
    }

    #[test]
    fn find_args_with_no_prefixes_finds_nothing() {
        let prefixes: [&str; 0] = [];
        assert!(find_args(&["-a"], &prefixes).is_empty());
    }

    #[test]
    fn get_arg_value_splits_on_first_equals() {
        assert_eq!(get_arg_value("-Target=Editor").unwrap(), "Editor");
        assert_eq!(get_arg_value("-define=A=B").unwrap(), "A=B");
        assert_eq!(get_arg_value("-empty=").unwrap(), "");
    }

    #[test]
    fn get_arg_value_without_equals_is_invalid() {
        let err = get_arg_value("-Verbose").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
        assert_eq!(err.details["id"], "-Verbose");
    }

    #[test]
    fn strip_args_removes_blacklisted_case_insensitively() {
        let args = ["-NoHotReload", "-verbose", "Shipping", "-nohotreload"];
        assert_eq!(
            strip_args(&args, &["-nohotreload", "-VERBOSE"]),
            vec!["Shipping"]
        );
    }

    #[test]
    fn strip_args_requires_exact_match() {
        let args = ["-verbose=1", "-verbose"];
        assert_eq!(strip_args(&args, &["-verbose"]), vec!["-verbose=1"]);
    }
}
