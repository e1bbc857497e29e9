//! Pre-build configuration.
//!
//! Handles loading, validating, and merging `prebuild.toml`. The file lives in
//! the project root (the directory that holds the documentation site) and is
//! optional: stock defaults describe the reference deployment, and a user file
//! only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! strict = false             # missing packaging source aborts the build
//! freshness_minutes = 5      # derived docs younger than this are kept
//!
//! [archive]
//! # source_root = "../jaclang/jaclang"
//! locate = ["python3", "-c", "import jaclang, os; print(os.path.dirname(jaclang.__file__))"]
//! output = "docs/playground/jaclang.zip"
//! folder_name = "jaclang"
//! sort_entries = true
//!
//! [docs.ast_reference]
//! output = "docs/internals/jac_ast.md"
//! command = ["jac", "tool", "pass_template"]
//!
//! [docs.language_reference]
//! output = "docs/learn/jac_ref.md"
//! command = ["jac", "tool", "automate_ref"]
//!
//! [contributors]
//! output = "docs/communityhub/top_contributors.md"
//! interpreter = "python3"
//! script = "scripts/top_contributors.py"
//! repositories = ["jaseci-labs/jaseci", "jaseci-labs/jac-vscode"]
//! ```
//!
//! ## Paths
//!
//! Every relative path (outputs, `source_root`, `script`) is resolved against
//! the project root, which is also the working directory of every command.
//!
//! ## Source Root
//!
//! `source_root` wins when set. Otherwise the `locate` command is run and the
//! directory it prints is packaged. An empty `locate` with no `source_root`
//! means there is nothing to package, which strict mode treats as fatal.
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{DocPaths, RepositoryList};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name inside the project root.
pub const CONFIG_FILENAME: &str = "prebuild.toml";

/// Largest accepted freshness window: one week.
const MAX_FRESHNESS_MINUTES: u64 = 7 * 24 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pre-build configuration loaded from `prebuild.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrebuildConfig {
    /// Abort the whole build when the packaging source is missing.
    pub strict: bool,
    /// Derived documents modified within this many minutes are kept.
    pub freshness_minutes: u64,
    /// Playground archive settings.
    pub archive: ArchiveConfig,
    /// Command-generated reference documents.
    pub docs: DocsConfig,
    /// Contributor leaderboard settings.
    pub contributors: ContributorsConfig,
}

impl Default for PrebuildConfig {
    fn default() -> Self {
        Self {
            strict: false,
            freshness_minutes: 5,
            archive: ArchiveConfig::default(),
            docs: DocsConfig::default(),
            contributors: ContributorsConfig::default(),
        }
    }
}

/// Playground archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Explicit toolkit source directory. Takes precedence over `locate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    /// Command printing the toolkit source directory.
    pub locate: Vec<String>,
    /// Archive output path.
    pub output: String,
    /// Logical folder every entry is stored under.
    pub folder_name: String,
    /// Write entries in file name order.
    pub sort_entries: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            source_root: None,
            locate: vec![
                "python3".to_string(),
                "-c".to_string(),
                "import jaclang, os; print(os.path.dirname(jaclang.__file__))".to_string(),
            ],
            output: "docs/playground/jaclang.zip".to_string(),
            folder_name: "jaclang".to_string(),
            sort_entries: true,
        }
    }
}

/// The two command-generated documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    pub ast_reference: CommandDocConfig,
    pub language_reference: CommandDocConfig,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            ast_reference: CommandDocConfig::new("docs/internals/jac_ast.md", "pass_template"),
            language_reference: CommandDocConfig::new("docs/learn/jac_ref.md", "automate_ref"),
        }
    }
}

/// A document whose full text is the stdout of a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDocConfig {
    pub output: String,
    pub command: Vec<String>,
}

impl CommandDocConfig {
    fn new(output: &str, tool: &str) -> Self {
        Self {
            output: output.to_string(),
            command: vec!["jac".to_string(), "tool".to_string(), tool.to_string()],
        }
    }
}

/// Contributor leaderboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContributorsConfig {
    pub output: String,
    /// Program that runs the script.
    pub interpreter: String,
    /// Leaderboard script, relative to the project root.
    pub script: String,
    /// Primary repository first, then extras in tab order.
    pub repositories: Vec<String>,
}

impl Default for ContributorsConfig {
    fn default() -> Self {
        Self {
            output: "docs/communityhub/top_contributors.md".to_string(),
            interpreter: "python3".to_string(),
            script: "scripts/top_contributors.py".to_string(),
            repositories: vec![
                "jaseci-labs/jaseci".to_string(),
                "jaseci-labs/jac-vscode".to_string(),
            ],
        }
    }
}

impl PrebuildConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freshness_minutes > MAX_FRESHNESS_MINUTES {
            return Err(ConfigError::Validation(format!(
                "freshness_minutes must be at most {MAX_FRESHNESS_MINUTES}"
            )));
        }
        validate_folder_name(&self.archive.folder_name)?;
        require_non_empty("archive.output", &self.archive.output)?;
        for (key, doc) in [
            ("docs.ast_reference", &self.docs.ast_reference),
            ("docs.language_reference", &self.docs.language_reference),
        ] {
            require_non_empty(&format!("{key}.output"), &doc.output)?;
            if doc.command.first().is_none_or(|p| p.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "{key}.command must name a program"
                )));
            }
        }
        require_non_empty("contributors.output", &self.contributors.output)?;
        require_non_empty("contributors.interpreter", &self.contributors.interpreter)?;
        require_non_empty("contributors.script", &self.contributors.script)?;
        self.repositories()?;
        Ok(())
    }

    /// The contributor repositories as a validated list.
    pub fn repositories(&self) -> Result<RepositoryList, ConfigError> {
        RepositoryList::new(self.contributors.repositories.clone())
            .map_err(|e| ConfigError::Validation(format!("contributors.repositories: {e}")))
    }

    /// Archive output path under `project_root`.
    pub fn archive_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.archive.output)
    }

    /// Explicit source root under `project_root`, if configured.
    pub fn explicit_source_root(&self, project_root: &Path) -> Option<PathBuf> {
        self.archive
            .source_root
            .as_deref()
            .map(|root| project_root.join(root))
    }

    /// Output paths of the derived documents under `project_root`.
    pub fn doc_paths(&self, project_root: &Path) -> DocPaths {
        DocPaths {
            ast_reference: project_root.join(&self.docs.ast_reference.output),
            language_reference: project_root.join(&self.docs.language_reference.output),
            contributors: project_root.join(&self.contributors.output),
        }
    }
}

fn require_non_empty(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    Ok(())
}

/// The folder name becomes the first segment of every archive entry, so it
/// must be a single plain path segment.
fn validate_folder_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "archive.folder_name must be a single path segment, got '{name}'"
        )));
    }
    Ok(())
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PrebuildConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PrebuildConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PrebuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<PrebuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `prebuild.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-prebuild configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Relative paths are resolved against
# the project root, which is also where every command runs.
# Unknown keys will cause an error.

# Abort the whole build when the packaging source directory is missing.
# When false, the build continues without a playground archive.
strict = false

# Derived documents modified within this many minutes are left untouched.
freshness_minutes = 5

# ---------------------------------------------------------------------------
# Playground archive
# ---------------------------------------------------------------------------
[archive]
# Toolkit source directory. When unset, `locate` is run instead.
# source_root = "../jaclang/jaclang"

# Command printing the toolkit source directory on stdout.
locate = ["python3", "-c", "import jaclang, os; print(os.path.dirname(jaclang.__file__))"]

# Where the archive is written. Deleted and rebuilt on every run.
output = "docs/playground/jaclang.zip"

# Every archive entry is stored as <folder_name>/<path relative to source>.
folder_name = "jaclang"

# Write entries in file name order so the archive is reproducible.
sort_entries = true

# ---------------------------------------------------------------------------
# Derived documents (regenerated only when older than freshness_minutes)
# ---------------------------------------------------------------------------
[docs.ast_reference]
output = "docs/internals/jac_ast.md"
command = ["jac", "tool", "pass_template"]

[docs.language_reference]
output = "docs/learn/jac_ref.md"
command = ["jac", "tool", "automate_ref"]

# ---------------------------------------------------------------------------
# Contributor leaderboard
# ---------------------------------------------------------------------------
[contributors]
output = "docs/communityhub/top_contributors.md"
interpreter = "python3"
script = "scripts/top_contributors.py"
# Primary repository first; the rest become extra tabs, in this order.
repositories = ["jaseci-labs/jaseci", "jaseci-labs/jac-vscode"]
"##
}
