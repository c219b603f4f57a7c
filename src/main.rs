use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Passthrough,
}

mod commands;
mod output;
mod tty;

use commands::{args, config, exec, file, text};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ue4util")]
#[command(version = VERSION)]
#[command(about = "Process and text helpers for Unreal Engine build tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command with live output and exit with its status
    Run(exec::RunArgs),
    /// Run a command, echo its output live, and report it as JSON
    Capture(exec::CaptureArgs),
    /// Local file read/write/patch
    File(file::FileArgs),
    /// Inspect and filter command-line argument lists
    Args(args::ArgsArgs),
    /// Join, quote and normalize text for command lines
    Text(text::TextArgs),
    /// Manage global ue4util configuration
    Config(config::ConfigArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Run(_) => ResponseMode::Passthrough,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    if let ResponseMode::Passthrough = response_mode(&cli.command) {
        let Commands::Run(args) = cli.command else {
            return std::process::ExitCode::from(1);
        };

        return match exec::run(args, &global) {
            Ok(exit_code) => std::process::ExitCode::from(exit_code_to_u8(exit_code)),
            Err(err) => {
                let exit_code = output::exit_code_for_error(err.code);
                let _ = output::print_result::<serde_json::Value>(Err(err));
                std::process::ExitCode::from(exit_code_to_u8(exit_code))
            }
        };
    }

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
