use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::CommandLine;

pub(super) fn apply_arguments(cmd: &mut Command, arguments: &str) {
    cmd.args(arguments.split_whitespace());
}

pub(super) fn shell_execute_and_wait(command: &CommandLine) -> io::Result<Option<i32>> {
    let program = resolve_program(&command.program)?;
    let script = format!(
        "{} {}",
        sh_single_quote(&program.to_string_lossy()),
        command.arguments
    );

    let status = Command::new("sh")
        .arg("-c")
        .arg(&script)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    Ok(status.code())
}

/// Resolve the program before `sh` sees it, so a missing or non-executable program is a
/// launch failure rather than a shell exit status.
fn resolve_program(program: &str) -> io::Result<PathBuf> {
    which::which(program).map_err(|err| {
        let path = Path::new(program);
        if path.components().count() > 1 && path.is_file() {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("'{program}' is not executable"),
            )
        } else {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{program}' was not found: {err}"),
            )
        }
    })
}

fn sh_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
