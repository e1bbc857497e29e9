//! Blocking execution of external commands with captured stdout.
//!
//! Every derived document ultimately comes from a child process. This module
//! owns the one place where a child is spawned, waited on and its output
//! decoded, so all generators fail the same way: a spawn error, a non-zero
//! exit, or stdout that is not UTF-8. There is no timeout; a hung child hangs
//! the build.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}{}", stderr_suffix(.stderr))]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("`{program}` wrote non-UTF-8 output: {source}")]
    Decode {
        program: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Build a [`Command`] from an argv slice, running in `working_dir`.
///
/// Returns `None` for an empty argv.
pub fn from_argv<S: AsRef<OsStr>>(argv: &[S], working_dir: &Path) -> Option<Command> {
    let (program, args) = argv.split_first()?;
    let mut command = Command::new(program);
    command.args(args).current_dir(working_dir);
    Some(command)
}

/// Run `command` to completion and return its stdout as a `String`.
///
/// Stderr is captured too and only surfaces inside [`ProcessError::Failed`].
pub fn run_captured(command: &mut Command) -> Result<String, ProcessError> {
    let program = describe(command);
    tracing::debug!(command = %program, "Running external command");

    let output = command.output().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;

    if !output.status.success() {
        return Err(ProcessError::Failed {
            program,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    String::from_utf8(output.stdout).map_err(|source| ProcessError::Decode { program, source })
}

/// Space-joined program and arguments, for messages.
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
