//! Child process execution with live output relay.
//!
//! The child's stderr and stdout are both attached to the write end of a
//! single OS pipe, so the parent reads one merged stream whose ordering is
//! the order the child actually wrote in. Each line read from that stream is
//! echoed and (for `capture`) appended to a buffer before the next line is
//! read.

use std::io::{self, BufRead, BufReader, PipeReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

use serde::Serialize;

use crate::error::{Error, ProcessCommandFailedDetails, ProcessSpawnFailedDetails, Result};
use crate::utils::shell;

/// Outcome of a completed child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub exit_code: i32,
    pub combined_output: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.combined_output.lines()
    }
}

/// Per-invocation options shared by `capture` and `run`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Written to the child's stdin, which is then closed. When absent the
    /// child reads from the null device.
    pub input: Option<String>,
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables layered over the inherited environment.
    pub env: Vec<(String, String)>,
    /// Turn a non-zero exit code into `process.command_failed`.
    pub raise_on_error: bool,
}

impl RunOptions {
    pub fn strict() -> Self {
        Self {
            raise_on_error: true,
            ..Self::default()
        }
    }
}

/// Spawns child processes and relays their merged output to an echo sink.
///
/// The runner holds no state besides the sink, so one instance can be reused
/// for any number of sequential invocations.
pub struct ProcessRunner<W: Write> {
    echo: W,
}

impl ProcessRunner<io::Stdout> {
    /// Runner that echoes to the parent's own standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProcessRunner<W> {
    pub fn new(echo: W) -> Self {
        Self { echo }
    }

    pub fn into_echo(self) -> W {
        self.echo
    }

    /// Run a command to completion, echoing and capturing its merged output.
    pub fn capture<S: AsRef<str>>(
        &mut self,
        command: &[S],
        options: &RunOptions,
    ) -> Result<CommandResult> {
        let command = owned_command(command);
        let mut combined_output = String::new();
        let exit_code = self.execute(&command, options, Some(&mut combined_output))?;
        settle(
            &command,
            exit_code,
            Some(&combined_output),
            options.raise_on_error,
        )?;

        Ok(CommandResult {
            exit_code,
            combined_output,
        })
    }

    /// Run a command to completion, echoing its merged output without
    /// retaining it. Returns the exit code.
    pub fn run<S: AsRef<str>>(&mut self, command: &[S], options: &RunOptions) -> Result<i32> {
        let command = owned_command(command);
        let exit_code = self.execute(&command, options, None)?;
        settle(&command, exit_code, None, options.raise_on_error)
    }

    fn execute(
        &mut self,
        command: &[String],
        options: &RunOptions,
        mut buffer: Option<&mut String>,
    ) -> Result<i32> {
        let display = shell::quote_args(command);
        let (mut child, reader) = spawn_merged(command, options)?;
        log_status!("run", "Spawned {} (pid {})", display, child.id());

        let stdin = child.stdin.take();
        let drained = thread::scope(|scope| {
            let feeder = stdin.map(|stdin| {
                let input = options.input.as_deref().unwrap_or_default();
                scope.spawn(move || feed_input(stdin, input))
            });

            let relayed = self.relay(reader, buffer.as_deref_mut());
            if relayed.is_err() {
                // Unblocks the feeder if the child stopped reading its input.
                let _ = child.kill();
            }

            let fed = match feeder {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::internal_unexpected("stdin writer panicked"))),
                None => Ok(()),
            };

            relayed.and(fed)
        });

        if let Err(err) = drained {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err);
        }

        let status = child
            .wait()
            .map_err(|e| Error::internal_io(e.to_string(), Some(format!("wait for {}", display))))?;
        let exit_code = exit_code_of(status);
        log_status!("run", "{} exited with code {}", display, exit_code);

        Ok(exit_code)
    }

    /// Drain the merged stream line by line, routing each line to the echo
    /// sink and, when present, the capture buffer.
    fn relay(&mut self, reader: PipeReader, mut buffer: Option<&mut String>) -> Result<()> {
        let mut reader = BufReader::new(reader);
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let read = reader.read_until(b'\n', &mut raw).map_err(|e| {
                Error::internal_io(e.to_string(), Some("read child output".to_string()))
            })?;
            if read == 0 {
                return Ok(());
            }

            let line = String::from_utf8_lossy(&raw);
            self.echo
                .write_all(line.as_bytes())
                .and_then(|()| self.echo.flush())
                .map_err(|e| {
                    Error::internal_io(e.to_string(), Some("echo child output".to_string()))
                })?;

            if let Some(buffer) = buffer.as_mut() {
                buffer.push_str(&line);
            }
        }
    }
}

/// Capture a command's merged output, echoing it to standard output.
pub fn capture<S: AsRef<str>>(command: &[S], options: &RunOptions) -> Result<CommandResult> {
    ProcessRunner::stdout().capture(command, options)
}

/// Run a command, echoing its merged output to standard output.
pub fn run<S: AsRef<str>>(command: &[S], options: &RunOptions) -> Result<i32> {
    ProcessRunner::stdout().run(command, options)
}

fn owned_command<S: AsRef<str>>(command: &[S]) -> Vec<String> {
    command.iter().map(|part| part.as_ref().to_string()).collect()
}

/// Apply the strict-mode policy to a finished child.
fn settle(
    command: &[String],
    exit_code: i32,
    output: Option<&str>,
    raise_on_error: bool,
) -> Result<i32> {
    if raise_on_error && exit_code != 0 {
        return Err(Error::process_command_failed(ProcessCommandFailedDetails {
            command: command.to_vec(),
            exit_code,
            output: output.map(str::to_string),
        }));
    }

    Ok(exit_code)
}

fn spawn_merged(command: &[String], options: &RunOptions) -> Result<(Child, PipeReader)> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::validation_missing_argument(vec!["command".to_string()]))?;

    let (reader, writer) = io::pipe()
        .map_err(|e| Error::internal_io(e.to_string(), Some("create output pipe".to_string())))?;
    let writer_for_stderr = writer
        .try_clone()
        .map_err(|e| Error::internal_io(e.to_string(), Some("clone output pipe".to_string())))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .envs(options.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(if options.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(writer)
        .stderr(writer_for_stderr);

    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir);
    }

    // `cmd` owns the parent's copies of the write end. They are closed when it
    // drops at the end of this function, so the reader hits EOF once the child
    // (and anything it spawned) closes its side.
    let child = cmd.spawn().map_err(|e| {
        Error::process_spawn_failed(ProcessSpawnFailedDetails {
            command: command.to_vec(),
            error: e.to_string(),
            working_dir: options
                .working_dir
                .as_ref()
                .map(|dir| dir.display().to_string()),
        })
    })?;

    Ok((child, reader))
}

fn feed_input(mut stdin: ChildStdin, input: &str) -> Result<()> {
    match stdin.write_all(input.as_bytes()) {
        Ok(()) => Ok(()),
        // The child exited or closed stdin without reading everything.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(
            e.to_string(),
            Some("write child stdin".to_string()),
        )),
    }
}

fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
