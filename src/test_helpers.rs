//! Shared test utilities for the docs-prebuild test suite.
//!
//! Provides filesystem fixtures (source trees, back-dated files), archive
//! inspection, and test doubles for the two generator seams so the hook can
//! be exercised without spawning processes.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(&tmp.path().join("toolkit"), &[("a.txt", "alpha")]);
//! let config = hook_config(tmp.path(), Some(tmp.path().join("toolkit")));
//!
//! let ast = CannedGenerator::ok("# AST");
//! let lang = CannedGenerator::ok("# Ref");
//! let contributors = CannedContributors::failing(1);
//! let err = PreBuildHook::new(&config, &ast, &lang, &contributors).run();
//! ```

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::command::ProcessError;
use crate::config::PrebuildConfig;
use crate::contributors::ContributorSource;
use crate::generators::DocGenerator;
use crate::hook::HookConfig;
use crate::staleness;
use crate::types::RepositoryList;

// =========================================================================
// Filesystem fixtures
// =========================================================================

/// Write `(relative path, content)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Move a file's modification time `by` into the past.
pub fn backdate(path: &Path, by: Duration) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}

/// Entry names of a zip, in archive order.
pub fn archive_entries(path: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Stock-default hook config rooted at `root`.
pub fn hook_config(root: &Path, source_root: Option<PathBuf>) -> HookConfig {
    let config = PrebuildConfig::default();
    HookConfig {
        source_root,
        archive_path: config.archive_path(root),
        folder_name: config.archive.folder_name.clone(),
        docs: config.doc_paths(root),
        freshness: staleness::minutes(config.freshness_minutes),
        repositories: config.repositories().unwrap(),
        strict: false,
        force: false,
        sort_entries: true,
    }
}

pub fn repositories(ids: &[&str]) -> RepositoryList {
    RepositoryList::new(ids.iter().map(|s| s.to_string()).collect()).unwrap()
}

fn canned_failure(code: i32) -> ProcessError {
    ProcessError::Failed {
        program: "canned".to_string(),
        status: format!("exit status: {code}"),
        stderr: String::new(),
    }
}

// =========================================================================
// Generator doubles
// =========================================================================

/// Returns fixed text (or a fixed exit failure) and counts calls.
pub struct CannedGenerator {
    output: Result<String, i32>,
    calls: Cell<usize>,
}

impl CannedGenerator {
    pub fn ok(text: &str) -> Self {
        Self {
            output: Ok(text.to_string()),
            calls: Cell::new(0),
        }
    }

    pub fn failing(exit_code: i32) -> Self {
        Self {
            output: Err(exit_code),
            calls: Cell::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl DocGenerator for CannedGenerator {
    fn generate(&self) -> Result<String, ProcessError> {
        self.calls.set(self.calls.get() + 1);
        self.output.clone().map_err(canned_failure)
    }
}

/// Contributor source that records every repository list it is given.
pub struct CannedContributors {
    output: Result<String, i32>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl CannedContributors {
    pub fn ok(html: &str) -> Self {
        Self {
            output: Ok(html.to_string()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(exit_code: i32) -> Self {
        Self {
            output: Err(exit_code),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl ContributorSource for CannedContributors {
    fn fetch(&self, repositories: &RepositoryList) -> Result<String, ProcessError> {
        self.calls
            .borrow_mut()
            .push(
                std::iter::once(repositories.primary())
                    .chain(repositories.extras().iter().map(String::as_str))
                    .map(str::to_string)
                    .collect(),
            );
        self.output.clone().map_err(canned_failure)
    }
}

// =========================================================================
// Log capture
// =========================================================================

/// Collects the messages of WARN events emitted while installed.
#[derive(Clone, Default)]
pub struct WarningCollector {
    messages: Arc<Mutex<Vec<String>>>,
}

impl WarningCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make this the thread's subscriber until the guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl<S: tracing::Subscriber> Layer<S> for WarningCollector {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.messages.lock().unwrap().push(visitor.0);
    }
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
