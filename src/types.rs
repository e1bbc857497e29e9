//! Shared types used across the pipeline stages.

use std::fmt;
use std::path::{Path, PathBuf};

/// One of the documentation pages derived from another source of truth.
///
/// The hook always visits them in [`DerivedDoc::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedDoc {
    /// Node taxonomy of the toolkit's syntax tree.
    AstReference,
    /// Canonical language reference generated from grammar metadata.
    LanguageReference,
    /// Contributor leaderboard HTML.
    Contributors,
}

impl DerivedDoc {
    pub const ORDER: [DerivedDoc; 3] = [
        DerivedDoc::AstReference,
        DerivedDoc::LanguageReference,
        DerivedDoc::Contributors,
    ];

    /// Human-readable label used in logs and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            DerivedDoc::AstReference => "AST reference",
            DerivedDoc::LanguageReference => "language reference",
            DerivedDoc::Contributors => "contributor leaderboard",
        }
    }
}

impl fmt::Display for DerivedDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output paths of the three derived documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPaths {
    pub ast_reference: PathBuf,
    pub language_reference: PathBuf,
    pub contributors: PathBuf,
}

impl DocPaths {
    pub fn get(&self, doc: DerivedDoc) -> &Path {
        match doc {
            DerivedDoc::AstReference => &self.ast_reference,
            DerivedDoc::LanguageReference => &self.language_reference,
            DerivedDoc::Contributors => &self.contributors,
        }
    }
}

/// Ordered list of `owner/name` repositories.
///
/// The first entry is the primary repository; the rest are "extra"
/// repositories rendered as additional leaderboard tabs. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryList(Vec<String>);

impl RepositoryList {
    /// Build a list, rejecting an empty input or malformed identifiers.
    pub fn new(repositories: Vec<String>) -> Result<Self, String> {
        if repositories.is_empty() {
            return Err("repository list must contain at least the primary repository".into());
        }
        if let Some(bad) = repositories.iter().find(|r| !is_repository_id(r)) {
            return Err(format!("'{bad}' is not an owner/name repository identifier"));
        }
        Ok(Self(repositories))
    }

    pub fn primary(&self) -> &str {
        &self.0[0]
    }

    pub fn extras(&self) -> &[String] {
        &self.0[1..]
    }
}

/// `owner/name`: exactly one slash, both halves non-empty, no whitespace.
fn is_repository_id(id: &str) -> bool {
    match id.split_once('/') {
        Some((owner, name)) => {
            !owner.is_empty()
                && !name.is_empty()
                && !name.contains('/')
                && !id.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
