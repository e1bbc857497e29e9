//! Producers of derived documentation text.
//!
//! A generator is a zero-argument producer of the complete contents of one
//! output file. The hook decides *whether* to call it; the generator only
//! decides *what* the file contains.

use crate::command::{self, ProcessError};
use std::path::PathBuf;
use std::process::Command;

pub trait DocGenerator {
    /// Produce the full replacement text for the document.
    fn generate(&self) -> Result<String, ProcessError>;
}

/// Runs an external command and uses its stdout as the document.
///
/// Used for the AST and language references, which are rendered by the
/// toolkit's own tooling.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    argv: Vec<String>,
    working_dir: PathBuf,
}

impl CommandGenerator {
    /// `argv` must be non-empty; configuration validation guarantees this.
    pub fn new(argv: Vec<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            working_dir: working_dir.into(),
        }
    }

    fn command(&self) -> Result<Command, ProcessError> {
        command::from_argv(&self.argv, &self.working_dir).ok_or_else(|| ProcessError::Spawn {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        })
    }
}

impl DocGenerator for CommandGenerator {
    fn generate(&self) -> Result<String, ProcessError> {
        command::run_captured(&mut self.command()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_argv_is_spawn_error() {
        let generator = CommandGenerator::new(Vec::new(), ".");
        assert!(matches!(
            generator.generate(),
            Err(ProcessError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_returns_stdout() {
        let tmp = TempDir::new().unwrap();
        let generator = CommandGenerator::new(
            vec!["sh".into(), "-c".into(), "printf '# Jac Language Reference\\n'".into()],
            tmp.path(),
        );
        assert_eq!(generator.generate().unwrap(), "# Jac Language Reference\n");
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_runs_in_working_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("grammar.lark"), "start: module").unwrap();
        let generator =
            CommandGenerator::new(vec!["cat".into(), "grammar.lark".into()], tmp.path());
        assert_eq!(generator.generate().unwrap(), "start: module");
        assert_eq!(generator.working_dir, tmp.path());
    }

    #[cfg(unix)]
    #[test]
    fn command_generator_propagates_failure() {
        let tmp = TempDir::new().unwrap();
        let generator =
            CommandGenerator::new(vec!["sh".into(), "-c".into(), "exit 3".into()], tmp.path());
        assert!(matches!(
            generator.generate(),
            Err(ProcessError::Failed { .. })
        ));
    }
}
