//! Contributor leaderboard fetching.
//!
//! The leaderboard HTML is produced by a separate script that talks to the
//! code-hosting API. This crate treats it as opaque: it builds the command
//! line, runs it from the project root, and takes whatever the script prints.
//!
//! ```text
//! <interpreter> <script> --repo <primary> --extra-repos <extra1> <extra2> ...
//! ```
//!
//! `--extra-repos` is left out entirely when the list has a single entry.
//! Repository order is preserved: the script renders extras as tabs in the
//! order it receives them.

use crate::command::{self, ProcessError};
use crate::generators::DocGenerator;
use crate::types::RepositoryList;
use std::path::PathBuf;
use std::process::Command;

/// Anything that can turn a repository list into leaderboard HTML.
pub trait ContributorSource {
    fn fetch(&self, repositories: &RepositoryList) -> Result<String, ProcessError>;
}

/// Invokes the contributor script through an interpreter.
#[derive(Debug, Clone)]
pub struct ScriptContributorSource {
    pub interpreter: String,
    pub script: PathBuf,
    /// Project root; the script runs here.
    pub working_dir: PathBuf,
}

impl ScriptContributorSource {
    /// The full command, ready to spawn.
    pub fn command(&self, repositories: &RepositoryList) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script)
            .args(fetch_args(repositories))
            .current_dir(&self.working_dir);
        command
    }
}

impl ContributorSource for ScriptContributorSource {
    fn fetch(&self, repositories: &RepositoryList) -> Result<String, ProcessError> {
        tracing::info!(
            primary = repositories.primary(),
            extras = repositories.extras().len(),
            "Fetching contributor leaderboard"
        );
        command::run_captured(&mut self.command(repositories))
    }
}

/// Script arguments for a repository list.
pub fn fetch_args(repositories: &RepositoryList) -> Vec<String> {
    let mut args = vec!["--repo".to_string(), repositories.primary().to_string()];
    if !repositories.extras().is_empty() {
        args.push("--extra-repos".to_string());
        args.extend(repositories.extras().iter().cloned());
    }
    args
}

/// Adapts a [`ContributorSource`] and a fixed repository list into a
/// [`DocGenerator`], so the hook treats the leaderboard like any other page.
pub struct LeaderboardGenerator<'a> {
    pub source: &'a dyn ContributorSource,
    pub repositories: &'a RepositoryList,
}

impl DocGenerator for LeaderboardGenerator<'_> {
    fn generate(&self) -> Result<String, ProcessError> {
        self.source.fetch(self.repositories)
    }
}
