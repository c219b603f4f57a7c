use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use ue4util::shell;

use super::CmdResult;

#[derive(Args)]
pub struct TextArgs {
    #[command(subcommand)]
    command: TextCommand,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShellFlavor {
    Posix,
    Windows,
}

#[derive(Subcommand)]
enum TextCommand {
    /// Join non-empty items with a delimiter
    Join {
        /// Delimiter placed between items
        #[arg(long, default_value = " ", allow_hyphen_values = true)]
        delim: String,
        /// Wrap items containing spaces in double quotes
        #[arg(long)]
        quote: bool,
        /// Items to join (after `--`)
        #[arg(last = true)]
        items: Vec<String>,
    },
    /// Escape a path for use as a command-line argument
    Escape {
        /// Path to escape
        #[arg(allow_hyphen_values = true)]
        path: String,
        /// Quoting rules (default: current platform)
        #[arg(long, value_enum)]
        flavor: Option<ShellFlavor>,
    },
    /// Convert backslashes to forward slashes
    Slashes {
        /// Paths to convert
        #[arg(required = true, allow_hyphen_values = true)]
        paths: Vec<String>,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum TextOutput {
    Single { command: String, text: String },
    Many { command: String, items: Vec<String> },
}

pub fn run(args: TextArgs, _global: &super::GlobalArgs) -> CmdResult<TextOutput> {
    let output = match args.command {
        TextCommand::Join { delim, quote, items } => TextOutput::Single {
            command: "text.join".to_string(),
            text: shell::join(&delim, &items, quote),
        },
        TextCommand::Escape { path, flavor } => TextOutput::Single {
            command: "text.escape".to_string(),
            text: match flavor {
                Some(ShellFlavor::Posix) => shell::quote_posix(&path),
                Some(ShellFlavor::Windows) => shell::quote_windows(&path),
                None => shell::escape_path_for_shell(&path),
            },
        },
        TextCommand::Slashes { paths } => TextOutput::Many {
            command: "text.slashes".to_string(),
            items: shell::forward_slashes(&paths),
        },
    };

    Ok((output, 0))
}
