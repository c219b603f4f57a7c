use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use ue4util::io::{self as file_io, PatchSummary};

use super::{parse_key_val, CmdResult};

#[derive(Args)]
pub struct FileArgs {
    #[command(subcommand)]
    command: FileCommand,
}

#[derive(Subcommand)]
enum FileCommand {
    /// Read a UTF-8 text file
    Read {
        /// File path
        path: String,
    },
    /// Write content to file (from stdin)
    Write {
        /// File path
        path: String,
        /// Write through a temporary file and rename
        #[arg(long)]
        atomic: bool,
    },
    /// Apply literal replacements to a file, in order
    Patch {
        /// File path
        path: String,
        /// Replacement pair (repeatable, applied in the order given)
        #[arg(
            long = "replace",
            value_name = "FROM=TO",
            required = true,
            value_parser = parse_key_val
        )]
        replacements: Vec<(String, String)>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReadOutput {
    pub path: String,
    pub content: String,
    pub bytes: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWriteOutput {
    pub path: String,
    pub bytes: usize,
    pub atomic: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum FileOutput {
    Read(FileReadOutput),
    Write(FileWriteOutput),
    Patch(PatchSummary),
}

pub fn run(args: FileArgs, _global: &super::GlobalArgs) -> CmdResult<FileOutput> {
    match args.command {
        FileCommand::Read { path } => read(&path),
        FileCommand::Write { path, atomic } => {
            let content = crate::tty::read_stdin("content")?;
            write(&path, &content, atomic)
        }
        FileCommand::Patch { path, replacements } => patch(&path, &replacements),
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn read(path: &str) -> CmdResult<FileOutput> {
    let resolved = expand(path);
    let content = file_io::read_file(&resolved, &format!("read {}", resolved.display()))?;

    Ok((
        FileOutput::Read(FileReadOutput {
            path: resolved.display().to_string(),
            bytes: content.len(),
            content,
        }),
        0,
    ))
}

fn write(path: &str, content: &str, atomic: bool) -> CmdResult<FileOutput> {
    let resolved = expand(path);
    let operation = format!("write {}", resolved.display());

    if atomic {
        file_io::write_file_atomic(&resolved, content, &operation)?;
    } else {
        file_io::write_file(&resolved, content, &operation)?;
    }

    Ok((
        FileOutput::Write(FileWriteOutput {
            path: resolved.display().to_string(),
            bytes: content.len(),
            atomic,
        }),
        0,
    ))
}

fn patch(path: &str, replacements: &[(String, String)]) -> CmdResult<FileOutput> {
    let summary = file_io::patch_file(&expand(path), replacements)?;
    Ok((FileOutput::Patch(summary), 0))
}
