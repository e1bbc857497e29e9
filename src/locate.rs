//! Discovery of the toolkit source directory.
//!
//! Documentation builds usually run in an environment where the toolkit is
//! installed as a package, not checked out next to the docs. Instead of
//! hard-coding an install path, the configuration can name a locator command
//! that prints the package directory, e.g.
//!
//! ```text
//! python3 -c "import jaclang, os; print(os.path.dirname(jaclang.__file__))"
//! ```
//!
//! The first non-empty line of its stdout is taken as the source root.
//! Relative answers are resolved against the directory the locator ran in.

use crate::command::{self, ProcessError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("locator command is empty")]
    EmptyCommand,
    #[error("locator failed: {0}")]
    Process(#[from] ProcessError),
    #[error("locator printed nothing")]
    NoOutput,
}

/// Run `argv` in `working_dir` and return the directory it reports.
///
/// The returned path is not checked for existence; the archive builder
/// reports a missing directory itself.
pub fn locate_source(argv: &[String], working_dir: &Path) -> Result<PathBuf, LocateError> {
    let mut command = command::from_argv(argv, working_dir).ok_or(LocateError::EmptyCommand)?;
    let stdout = command::run_captured(&mut command)?;
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(LocateError::NoOutput)?;
    Ok(working_dir.join(line))
}
