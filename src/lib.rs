//! # docs-prebuild
//!
//! Pre-build hook for a documentation site. It runs before every site build
//! and prepares the parts of the docs tree that are derived from somewhere
//! else: a zip of the toolkit's source for the in-browser playground, and
//! three generated pages.
//!
//! # Pipeline
//!
//! One sequential pass, no concurrency:
//!
//! ```text
//! 1. Package    <source_root>/  →  docs/playground/jaclang.zip   (always rebuilt)
//! 2. Generate   jac tool pass_template   →  docs/internals/jac_ast.md      (if stale)
//! 3. Generate   jac tool automate_ref    →  docs/learn/jac_ref.md          (if stale)
//! 4. Fetch      scripts/top_contributors.py → docs/communityhub/top_contributors.md (if stale)
//! ```
//!
//! Regeneration is gated purely on the document's age. Anything written in the
//! last few minutes is kept, so repeated builds while editing stay fast.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`hook`] | Orchestrator: archive step, then each derived document in order |
//! | [`archive`] | Walks a source tree into a Deflate zip under one top-level folder |
//! | [`staleness`] | Age-based regeneration oracle |
//! | [`generators`] | `DocGenerator` seam and the command-backed implementation |
//! | [`contributors`] | `ContributorSource` seam and the leaderboard script runner |
//! | [`locate`] | Finds the installed toolkit source by asking the interpreter |
//! | [`command`] | Subprocess spawning with captured, UTF-8 decoded stdout |
//! | [`config`] | Layered `prebuild.toml` loading and validation |
//! | [`types`] | Shared types (`DerivedDoc`, `DocPaths`, `RepositoryList`) |
//! | [`output`] | CLI output formatting for run, archive and check |
//!
//! # Design Decisions
//!
//! ## Missing Source Is a Policy, Not an Error
//!
//! Contributors building the docs locally often do not have the toolkit
//! source checked out. In permissive mode (the default) the hook logs a
//! warning and builds the site without a playground archive. CI runs with
//! `--strict`, where the same condition fails the build.
//!
//! ## Generators Behind Traits
//!
//! The hook only sees [`generators::DocGenerator`] and
//! [`contributors::ContributorSource`]. Production wires them to external
//! commands; tests pass in canned doubles and never spawn a process.

pub mod archive;
pub mod command;
pub mod config;
pub mod contributors;
pub mod generators;
pub mod hook;
pub mod locate;
pub mod output;
pub mod staleness;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Install the global tracing subscriber.
///
/// `verbose` picks the base level (0 = warn, 1 = info, 2 = debug, 3+ =
/// trace); `RUST_LOG` directives refine it further.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
