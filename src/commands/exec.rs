use clap::Args;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use ue4util::defaults::{self, EchoTarget, ProcessDefaults};
use ue4util::runner::{self, CommandResult, ProcessRunner, RunOptions};

use super::{parse_key_val, CmdResult};

/// Flags shared by `run` and `capture`.
#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Working directory for the child process
    #[arg(long, value_name = "DIR")]
    cwd: Option<String>,

    /// Fail when the child exits non-zero (overrides config)
    #[arg(long, conflicts_with = "lenient")]
    strict: bool,

    /// Report a non-zero exit as data (overrides config)
    #[arg(long)]
    lenient: bool,

    /// Extra environment variable for the child (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    env: Vec<(String, String)>,

    /// Program and arguments (no shell interpretation)
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    command: Vec<String>,
}

impl ExecArgs {
    fn options(&self, defaults: &ProcessDefaults) -> RunOptions {
        let raise_on_error = if self.strict {
            true
        } else if self.lenient {
            false
        } else {
            defaults.raise_on_error
        };

        let mut env: BTreeMap<String, String> = defaults.env.clone();
        env.extend(self.env.iter().cloned());

        RunOptions {
            input: None,
            working_dir: self
                .cwd
                .as_deref()
                .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned())),
            env: env.into_iter().collect(),
            raise_on_error,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    #[command(flatten)]
    exec: ExecArgs,

    /// Text written to the child's stdin
    #[arg(long, conflicts_with = "stdin")]
    input: Option<String>,

    /// Forward this process's stdin to the child
    #[arg(long)]
    stdin: bool,

    /// Where live output is echoed (default from config)
    #[arg(long, value_enum)]
    echo: Option<EchoTarget>,
}

/// Run a command with live output on stdout. Returns the exit status this
/// process should report.
pub fn run(args: RunArgs, _global: &super::GlobalArgs) -> ue4util::Result<i32> {
    let options = args.exec.options(&defaults::load_defaults().process);
    let exit_code = runner::run(&args.exec.command, &options)?;
    Ok(shell_exit_status(exit_code))
}

/// Capture a command's merged output and report it as JSON.
pub fn capture(args: CaptureArgs, _global: &super::GlobalArgs) -> CmdResult<CommandResult> {
    let process = defaults::load_defaults().process;
    let mut options = args.exec.options(&process);

    options.input = if args.stdin {
        Some(crate::tty::read_stdin("stdin")?)
    } else {
        args.input
    };

    let echo: Box<dyn Write> = match args.echo.unwrap_or(process.capture_echo) {
        EchoTarget::Stdout => Box::new(io::stdout()),
        EchoTarget::Stderr => Box::new(io::stderr()),
    };

    let result = ProcessRunner::new(echo).capture(&args.exec.command, &options)?;
    let exit_code = shell_exit_status(result.exit_code);

    Ok((result, exit_code))
}

/// Map a child exit code to a process exit status, using the shell's
/// `128 + signal` convention for signal-terminated children.
fn shell_exit_status(exit_code: i32) -> i32 {
    if exit_code < 0 {
        128 + exit_code.saturating_neg()
    } else {
        exit_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        exec: ExecArgs,
    }

    fn parse(argv: &[&str]) -> ExecArgs {
        let mut full = vec!["ue4util"];
        full.extend_from_slice(argv);
        Harness::try_parse_from(full).unwrap().exec
    }

    fn builtin() -> ProcessDefaults {
        defaults::builtin_defaults().process
    }

    #[test]
    fn command_keeps_hyphenated_arguments() {
        let exec = parse(&["--cwd", "/tmp", "--", "make", "-j8", "--keep-going"]);
        assert_eq!(exec.command, vec!["make", "-j8", "--keep-going"]);
        assert_eq!(exec.cwd.as_deref(), Some("/tmp"));
    }

    #[test]
    fn strict_flag_overrides_config() {
        let exec = parse(&["--strict", "true"]);
        assert!(exec.options(&builtin()).raise_on_error);
    }

    #[test]
    fn lenient_flag_overrides_strict_config() {
        let mut process = builtin();
        process.raise_on_error = true;

        assert!(parse(&["true"]).options(&process).raise_on_error);
        assert!(!parse(&["--lenient", "true"]).options(&process).raise_on_error);
    }

    #[test]
    fn env_flags_win_over_config_env() {
        let mut process = builtin();
        process.env.insert("A".to_string(), "config".to_string());
        process.env.insert("B".to_string(), "config".to_string());

        let options = parse(&["--env", "B=flag", "true"]).options(&process);
        assert_eq!(
            options.env,
            vec![
                ("A".to_string(), "config".to_string()),
                ("B".to_string(), "flag".to_string())
            ]
        );
    }

    #[test]
    fn working_dir_expands_tilde() {
        let options = parse(&["--cwd", "~/Projects", "true"]).options(&builtin());
        let dir = options.working_dir.unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("Projects"));
    }

    #[test]
    fn signal_exit_codes_follow_shell_convention() {
        assert_eq!(shell_exit_status(0), 0);
        assert_eq!(shell_exit_status(7), 7);
        assert_eq!(shell_exit_status(-9), 137);
    }
}
