use clap::{Args, Subcommand};
use serde::Serialize;

use ue4util::args::{find_args, get_arg_value, strip_args};

use super::CmdResult;

#[derive(Args)]
pub struct ArgsArgs {
    #[command(subcommand)]
    command: ArgsCommand,
}

#[derive(Subcommand)]
enum ArgsCommand {
    /// List the arguments that start with any of the prefixes
    Find {
        /// Prefix to match, case-insensitive (repeatable)
        #[arg(long = "prefix", required = true, allow_hyphen_values = true)]
        prefixes: Vec<String>,
        /// Arguments to search (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Print the value of a `-KEY=VALUE` argument
    Value {
        /// Argument to split
        #[arg(allow_hyphen_values = true)]
        arg: String,
    },
    /// Remove blacklisted arguments
    Strip {
        /// Argument to remove, case-insensitive (repeatable)
        #[arg(long = "blacklist", required = true, allow_hyphen_values = true)]
        blacklist: Vec<String>,
        /// Arguments to filter (after `--`)
        #[arg(last = true)]
        args: Vec<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgsOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

pub fn run(args: ArgsArgs, _global: &super::GlobalArgs) -> CmdResult<ArgsOutput> {
    let output = match args.command {
        ArgsCommand::Find { prefixes, args } => ArgsOutput {
            command: "args.find".to_string(),
            args: Some(find_args(&args, &prefixes)),
            value: None,
        },
        ArgsCommand::Value { arg } => ArgsOutput {
            command: "args.value".to_string(),
            args: None,
            value: Some(get_arg_value(&arg)?.to_string()),
        },
        ArgsCommand::Strip { blacklist, args } => ArgsOutput {
            command: "args.strip".to_string(),
            args: Some(strip_args(&args, &blacklist)),
            value: None,
        },
    };

    Ok((output, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ArgsArgs,
    }

    fn run_argv(argv: &[&str]) -> ue4util::Result<ArgsOutput> {
        let mut full = vec!["ue4util"];
        full.extend_from_slice(argv);
        let parsed = Harness::try_parse_from(full).unwrap();
        run(parsed.args, &crate::commands::GlobalArgs {}).map(|(out, _)| out)
    }

    #[test]
    fn find_takes_arguments_after_separator() {
        let out = run_argv(&[
            "find", "--prefix", "-target=", "--", "-Target=Editor", "-Verbose",
        ])
        .unwrap();
        assert_eq!(out.args.unwrap(), vec!["-Target=Editor"]);
    }

    #[test]
    fn value_accepts_hyphenated_argument() {
        let out = run_argv(&["value", "-Platform=Linux"]).unwrap();
        assert_eq!(out.value.as_deref(), Some("Linux"));
    }

    #[test]
    fn value_without_equals_is_an_error() {
        let err = run_argv(&["value", "-Verbose"]).err().unwrap();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn strip_removes_blacklisted() {
        let out = run_argv(&[
            "strip", "--blacklist", "-nohotreload", "--", "-NoHotReload", "Development",
        ])
        .unwrap();
        assert_eq!(out.args.unwrap(), vec!["Development"]);
    }
}
