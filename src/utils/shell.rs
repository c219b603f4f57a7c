//! Shell escaping, quoting and joining utilities.

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'"'"'` (end quote, double-quoted quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\"'\"'")
}

fn is_posix_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
}

/// Quote a value for a POSIX shell.
/// - Empty strings become `''`
/// - Strings made only of `[A-Za-z0-9_@%+=:,./-]` pass through unchanged
/// - Anything else is wrapped in single quotes with embedded quotes escaped
pub fn quote_posix(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }

    if value.chars().all(is_posix_safe) {
        return value.to_string();
    }

    format!("'{}'", escape_single_quote_content(value))
}

/// Quote a value for the Windows command interpreter.
/// Always wraps in double quotes; embedded double quotes are doubled.
pub fn quote_windows(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Escape a filesystem path for use as a command-line argument on the
/// current platform.
pub fn escape_path_for_shell(path: &str) -> String {
    if cfg!(windows) {
        quote_windows(path)
    } else {
        quote_posix(path)
    }
}

/// Quote a single argument for display in messages and logs.
pub fn quote_arg(arg: &str) -> String {
    quote_posix(arg)
}

/// Quote and join a command vector for display.
pub fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace Windows directory separators with forward slashes.
pub fn forward_slashes<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    paths.iter().map(|p| p.as_ref().replace('\\', "/")).collect()
}

/// Join items with `delim` after dropping empty strings.
///
/// With `quote` set, items containing a space are wrapped in double quotes.
pub fn join<S: AsRef<str>>(delim: &str, items: &[S], quote: bool) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter(|item| !item.is_empty())
        .map(|item| {
            if quote && item.contains(' ') {
                format!("\"{}\"", item)
            } else {
                item.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(delim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_posix_simple() {
        assert_eq!(quote_posix("UE4Editor"), "UE4Editor");
        assert_eq!(quote_posix("/opt/UnrealEngine/Engine"), "/opt/UnrealEngine/Engine");
        assert_eq!(quote_posix("-Target=Editor"), "-Target=Editor");
    }

    #[test]
    fn quote_posix_with_spaces() {
        assert_eq!(quote_posix("/home/me/My Project"), "'/home/me/My Project'");
    }

    #[test]
    fn quote_posix_with_single_quote() {
        assert_eq!(quote_posix("it's"), "'it'\"'\"'s'");
    }

    #[test]
    fn quote_posix_empty() {
        assert_eq!(quote_posix(""), "''");
    }

    #[test]
    fn quote_posix_metacharacters() {
        assert_eq!(quote_posix("a;b"), "'a;b'");
        assert_eq!(quote_posix("$HOME"), "'$HOME'");
        assert_eq!(quote_posix("*.uproject"), "'*.uproject'");
    }

    #[test]
    fn quote_windows_wraps_and_doubles_quotes() {
        assert_eq!(quote_windows(r"C:\Program Files\Epic"), r#""C:\Program Files\Epic""#);
        assert_eq!(quote_windows(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(quote_windows(""), r#""""#);
    }

    #[cfg(not(windows))]
    #[test]
    fn escape_path_for_shell_uses_posix_quoting() {
        assert_eq!(escape_path_for_shell("/tmp/My Game"), "'/tmp/My Game'");
    }

    #[test]
    fn quote_args_mixed() {
        let args = vec!["sh".to_string(), "-c".to_string(), "echo hi".to_string()];
        assert_eq!(quote_args(&args), "sh -c 'echo hi'");
    }

    #[test]
    fn forward_slashes_converts_each_path() {
        let paths = [r"C:\Engine\Binaries", "already/unix", r"mixed\path/here"];
        assert_eq!(
            forward_slashes(&paths),
            vec!["C:/Engine/Binaries", "already/unix", "mixed/path/here"]
        );
    }

    #[test]
    fn join_drops_empty_items() {
        assert_eq!(join(" ", &["-a", "", "-b", ""], false), "-a -b");
    }

    #[test]
    fn join_quotes_items_with_spaces() {
        assert_eq!(
            join(" ", &["-I/usr/include", "-I/opt/My Libs", ""], true),
            "-I/usr/include \"-I/opt/My Libs\""
        );
    }

    #[test]
    fn join_without_quote_leaves_spaces() {
        assert_eq!(join(",", &["a b", "c"], false), "a b,c");
    }

    #[test]
    fn join_of_nothing_is_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(join(" ", &empty, true), "");
        assert_eq!(join(" ", &["", ""], true), "");
    }
}
