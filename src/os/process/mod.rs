//! Child process launching.
//!
//! Two launch shapes exist:
//! - detached: shell-assisted and hidden, waits for exit, output is discarded
//! - capturing: direct and hidden, stdout is drained to the end before waiting
//!
//! Windows uses `ShellExecuteExW` / `CREATE_NO_WINDOW`; other platforms resolve the program on
//! `PATH` and go through `sh -c`. Exit status never decides whether a launch failed.

#[cfg(not(target_os = "windows"))]
mod unix;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(not(target_os = "windows"))]
use unix::{apply_arguments, shell_execute_and_wait};
#[cfg(target_os = "windows")]
use windows::{apply_arguments, shell_execute_and_wait};

use std::fmt;
use std::io::{self, Read};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::error::{HostError, Result};

/// One external program invocation: the executable and its raw argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub arguments: String,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: arguments.into(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arguments.is_empty() {
            write!(f, "{}", self.program)
        } else {
            write!(f, "{} {}", self.program, self.arguments)
        }
    }
}

/// Launches external programs on behalf of the host control operations.
pub trait CommandRunner {
    /// Shell-assisted, hidden launch. Returns once the child process has exited.
    fn launch_detached(&self, command: &CommandLine) -> Result<()>;

    /// Direct, hidden launch with stdout captured. Returns the full stdout text.
    fn launch_capturing(&self, command: &CommandLine) -> Result<String>;
}

/// Runs commands on the real host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn launch_detached(&self, command: &CommandLine) -> Result<()> {
        debug!(program = %command.program, arguments = %command.arguments, "launching detached");

        let exit_code = shell_execute_and_wait(command).map_err(|source| HostError::Launch {
            program: command.program.clone(),
            source,
        })?;

        match exit_code {
            Some(0) => {}
            Some(code) => warn!(command = %command, code, "command exited with non-zero status"),
            None => debug!(command = %command, "no exit code reported"),
        }

        Ok(())
    }

    fn launch_capturing(&self, command: &CommandLine) -> Result<String> {
        debug!(program = %command.program, arguments = %command.arguments, "launching with captured output");

        let mut cmd = Command::new(&command.program);
        apply_arguments(&mut cmd, &command.arguments);

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| HostError::Launch {
                program: command.program.clone(),
                source,
            })?;

        let mut output = String::new();
        let read = match child.stdout.take() {
            Some(mut stdout) => stdout.read_to_string(&mut output).map(|_| ()),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "stdout was not captured",
            )),
        };

        if let Err(source) = read {
            // Reap the child so it does not outlive the failed call.
            let _ = child.kill();
            let _ = child.wait();
            return Err(HostError::OutputRead {
                program: command.program.clone(),
                source,
            });
        }

        let status = child.wait().map_err(|source| HostError::OutputRead {
            program: command.program.clone(),
            source,
        })?;

        if !status.success() {
            warn!(command = %command, %status, "command exited with non-zero status");
        }
        debug!(command = %command, bytes = output.len(), "captured output");

        Ok(output)
    }
}
