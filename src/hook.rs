//! The pre-build hook: one sequential pass that prepares the docs tree.
//!
//! ```text
//! 1. remove <archive>                       (if present)
//! 2. build <archive> from <source_root>     (SourceMissing: warn | abort)
//! 3. AST reference          stale? → regenerate : skip
//! 4. language reference     stale? → regenerate : skip
//! 5. contributor leaderboard stale? → fetch      : skip
//! ```
//!
//! The archive has no staleness check: it is deleted and rebuilt on every
//! run. Documents are rewritten only when the staleness oracle says so, and a
//! rewrite fully replaces the file.
//!
//! Failures are never retried. In permissive mode a missing packaging source
//! is downgraded to a warning and the build continues without an archive;
//! everything else (strict-mode missing source, generator failures, write
//! errors) aborts the hook. Documents processed before a failure keep
//! whatever state they reached.

use crate::archive::{self, ArchiveError, ArchiveOptions, ArchiveSummary};
use crate::command::ProcessError;
use crate::config::{ConfigError, PrebuildConfig};
use crate::contributors::{ContributorSource, LeaderboardGenerator};
use crate::generators::DocGenerator;
use crate::locate;
use crate::staleness::{self, Staleness};
use crate::types::{DerivedDoc, DocPaths, RepositoryList};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Packaging source not found: {}", describe_source(.path))]
    SourceMissing { path: Option<PathBuf> },
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("Failed to remove previous archive {}: {source}", .path.display())]
    RemoveArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to generate {doc}: {source}")]
    Generate {
        doc: DerivedDoc,
        #[source]
        source: ProcessError,
    },
    #[error("Failed to write {doc} to {}: {source}", .path.display())]
    WriteDoc {
        doc: DerivedDoc,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn describe_source(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "no source directory could be located".to_string(),
    }
}

/// Everything the hook needs, resolved to concrete paths.
#[derive(Debug, Clone)]
pub struct HookConfig {
    /// Directory to package. `None` when it could not be located.
    pub source_root: Option<PathBuf>,
    pub archive_path: PathBuf,
    pub folder_name: String,
    pub docs: DocPaths,
    pub freshness: Duration,
    pub repositories: RepositoryList,
    /// Missing packaging source aborts the hook.
    pub strict: bool,
    /// Regenerate every document regardless of age.
    pub force: bool,
    pub sort_entries: bool,
}

impl HookConfig {
    /// Resolve a loaded config against `project_root`.
    ///
    /// When no explicit `source_root` is configured the locator command is
    /// run here; a failing locator leaves `source_root` unset and is logged,
    /// so the hook's missing-source policy decides what happens next.
    pub fn resolve(config: &PrebuildConfig, project_root: &Path) -> Result<Self, ConfigError> {
        let source_root = match config.explicit_source_root(project_root) {
            Some(root) => Some(root),
            None if config.archive.locate.is_empty() => None,
            None => match locate::locate_source(&config.archive.locate, project_root) {
                Ok(root) => {
                    tracing::debug!(source = %root.display(), "Located packaging source");
                    Some(root)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not locate packaging source");
                    None
                }
            },
        };

        Ok(Self {
            source_root,
            archive_path: config.archive_path(project_root),
            folder_name: config.archive.folder_name.clone(),
            docs: config.doc_paths(project_root),
            freshness: staleness::minutes(config.freshness_minutes),
            repositories: config.repositories()?,
            strict: config.strict,
            force: false,
            sort_entries: config.archive.sort_entries,
        })
    }

    fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            create_parent_dir: !self.strict,
            sort_entries: self.sort_entries,
        }
    }
}

/// What happened to the playground archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Built(ArchiveSummary),
    /// Permissive mode only: the source was missing.
    Skipped { reason: String },
}

/// What happened to one derived document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocAction {
    Regenerated { bytes: usize },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocOutcome {
    pub doc: DerivedDoc,
    pub path: PathBuf,
    /// Oracle verdict before anything was written.
    pub staleness: Staleness,
    pub action: DocAction,
}

/// Result of a successful hook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReport {
    /// A previous archive was deleted before rebuilding.
    pub removed_previous_archive: bool,
    pub archive: ArchiveOutcome,
    /// In [`DerivedDoc::ORDER`].
    pub docs: Vec<DocOutcome>,
}

/// The orchestrator. Generators are borrowed so callers (and tests) choose
/// the implementations.
pub struct PreBuildHook<'a> {
    config: &'a HookConfig,
    ast_reference: &'a dyn DocGenerator,
    language_reference: &'a dyn DocGenerator,
    contributors: &'a dyn ContributorSource,
}

impl<'a> PreBuildHook<'a> {
    pub fn new(
        config: &'a HookConfig,
        ast_reference: &'a dyn DocGenerator,
        language_reference: &'a dyn DocGenerator,
        contributors: &'a dyn ContributorSource,
    ) -> Self {
        Self {
            config,
            ast_reference,
            language_reference,
            contributors,
        }
    }

    /// Run the whole hook.
    pub fn run(&self) -> Result<HookReport, HookError> {
        tracing::info!("Running pre-build hook");

        let (removed_previous_archive, archive) = self.package()?;

        let leaderboard = LeaderboardGenerator {
            source: self.contributors,
            repositories: &self.config.repositories,
        };
        let now = SystemTime::now();
        let mut docs = Vec::with_capacity(DerivedDoc::ORDER.len());
        for doc in DerivedDoc::ORDER {
            let generator: &dyn DocGenerator = match doc {
                DerivedDoc::AstReference => self.ast_reference,
                DerivedDoc::LanguageReference => self.language_reference,
                DerivedDoc::Contributors => &leaderboard,
            };
            docs.push(self.refresh(doc, generator, now)?);
        }

        Ok(HookReport {
            removed_previous_archive,
            archive,
            docs,
        })
    }

    /// Delete the previous archive and build a new one.
    ///
    /// Returns whether a previous archive was removed, plus the outcome.
    pub fn package(&self) -> Result<(bool, ArchiveOutcome), HookError> {
        self.package_with(self.config.strict)
    }

    /// Like [`package`](Self::package), but a missing source is always an
    /// error. Parent directory creation still follows the configured mode.
    pub fn package_required(&self) -> Result<(bool, ArchiveSummary), HookError> {
        match self.package_with(true)? {
            (removed, ArchiveOutcome::Built(summary)) => Ok((removed, summary)),
            (_, ArchiveOutcome::Skipped { .. }) => Err(HookError::SourceMissing {
                path: self.config.source_root.clone(),
            }),
        }
    }

    fn package_with(&self, source_required: bool) -> Result<(bool, ArchiveOutcome), HookError> {
        let removed = remove_previous_archive(&self.config.archive_path)?;

        if let Some(root) = &self.config.source_root {
            match archive::build_archive(
                root,
                &self.config.archive_path,
                &self.config.folder_name,
                self.config.archive_options(),
            ) {
                Ok(summary) => return Ok((removed, ArchiveOutcome::Built(summary))),
                Err(ArchiveError::SourceMissing(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let path = self.config.source_root.clone();
        if source_required {
            return Err(HookError::SourceMissing { path });
        }
        let reason = format!("packaging source not found: {}", describe_source(&path));
        tracing::warn!("{reason}. Runnable code blocks will not work without the playground archive.");
        Ok((removed, ArchiveOutcome::Skipped { reason }))
    }

    fn refresh(
        &self,
        doc: DerivedDoc,
        generator: &dyn DocGenerator,
        now: SystemTime,
    ) -> Result<DocOutcome, HookError> {
        let path = self.config.docs.get(doc).to_path_buf();
        let verdict = staleness::check(&path, self.config.freshness, now);

        if !self.config.force && !verdict.is_stale() {
            tracing::info!(doc = %doc, path = %path.display(), "Skipping {doc}: {verdict}");
            return Ok(DocOutcome {
                doc,
                path,
                staleness: verdict,
                action: DocAction::Skipped,
            });
        }

        tracing::info!(doc = %doc, path = %path.display(), "Generating {doc} ({verdict})");
        let text = generator
            .generate()
            .map_err(|source| HookError::Generate { doc, source })?;
        write_document(&path, &text).map_err(|source| HookError::WriteDoc {
            doc,
            path: path.clone(),
            source,
        })?;

        Ok(DocOutcome {
            doc,
            path,
            staleness: verdict,
            action: DocAction::Regenerated { bytes: text.len() },
        })
    }
}

/// Oracle verdict for one document, computed without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocStatus {
    pub doc: DerivedDoc,
    pub path: PathBuf,
    pub staleness: Staleness,
}

/// What the hook would decide for each document at `now`.
pub fn inspect_documents(config: &HookConfig, now: SystemTime) -> Vec<DocStatus> {
    DerivedDoc::ORDER
        .iter()
        .map(|&doc| {
            let path = config.docs.get(doc).to_path_buf();
            let staleness = staleness::check(&path, config.freshness, now);
            DocStatus {
                doc,
                path,
                staleness,
            }
        })
        .collect()
}

fn remove_previous_archive(path: &Path) -> Result<bool, HookError> {
    if !path.exists() {
        return Ok(false);
    }
    tracing::info!("Removing existing archive: {}", path.display());
    fs::remove_file(path).map_err(|source| HookError::RemoveArchive {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Truncating write; creates the parent directory when needed.
fn write_document(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}
