//! CLI output formatting for the pre-build commands.
//!
//! Each command has a `format_*` function returning lines (pure, no I/O) and
//! a `print_*` wrapper that writes them to stdout. Paths are shown relative to
//! the project root whenever they live inside it.
//!
//! ## Run
//!
//! ```text
//! Archive
//!     Removed previous archive
//!     docs/playground/jaclang.zip (214 entries, 1.8 MB)
//!
//! Documents
//!     AST reference → docs/internals/jac_ast.md
//!         regenerated, 12.4 KB (was missing)
//!     language reference → docs/learn/jac_ref.md
//!         kept, fresh (2m 10s old)
//!     contributor leaderboard → docs/communityhub/top_contributors.md
//!         regenerated, 3.1 KB (was stale (3h 02m old))
//! ```
//!
//! ## Check
//!
//! ```text
//! Source
//!     /usr/lib/python3/site-packages/jaclang
//!
//! Documents (freshness window 5m 00s)
//!     AST reference → docs/internals/jac_ast.md
//!         missing, would regenerate
//! ```

use crate::archive::ArchiveSummary;
use crate::hook::{ArchiveOutcome, DocAction, DocStatus, HookReport};
use crate::staleness::{Staleness, format_age};
use crate::types::DerivedDoc;
use std::path::Path;
use std::time::Duration;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `root` when it is inside it, else as given.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Human-readable byte count with one decimal above 1 KB.
fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

fn doc_header(doc: DerivedDoc, path: &Path, root: &Path) -> String {
    format!("{}{} → {}", indent(1), doc, display_path(path, root))
}

fn archive_line(summary: &ArchiveSummary, root: &Path) -> String {
    let noun = if summary.entries == 1 { "entry" } else { "entries" };
    format!(
        "{}{} ({} {}, {})",
        indent(1),
        display_path(&summary.path, root),
        summary.entries,
        noun,
        format_bytes(summary.bytes)
    )
}

// ============================================================================
// run
// ============================================================================

/// Format the result of a full hook run.
pub fn format_run_output(report: &HookReport, project_root: &Path) -> Vec<String> {
    let mut lines = vec!["Archive".to_string()];
    if report.removed_previous_archive {
        lines.push(format!("{}Removed previous archive", indent(1)));
    }
    match &report.archive {
        ArchiveOutcome::Built(summary) => lines.push(archive_line(summary, project_root)),
        ArchiveOutcome::Skipped { reason } => {
            lines.push(format!("{}Skipped: {}", indent(1), reason));
        }
    }

    lines.push(String::new());
    lines.push("Documents".to_string());
    for outcome in &report.docs {
        lines.push(doc_header(outcome.doc, &outcome.path, project_root));
        let detail = match outcome.action {
            DocAction::Regenerated { bytes } => format!(
                "regenerated, {} (was {})",
                format_bytes(bytes as u64),
                outcome.staleness
            ),
            DocAction::Skipped => format!("kept, {}", outcome.staleness),
        };
        lines.push(format!("{}{}", indent(2), detail));
    }
    lines
}

pub fn print_run_output(report: &HookReport, project_root: &Path) {
    for line in format_run_output(report, project_root) {
        println!("{}", line);
    }
}

/// Format the result of the `archive` command.
pub fn format_archive_output(
    removed_previous: bool,
    summary: &ArchiveSummary,
    project_root: &Path,
) -> Vec<String> {
    let mut lines = vec!["Archive".to_string()];
    if removed_previous {
        lines.push(format!("{}Removed previous archive", indent(1)));
    }
    lines.push(archive_line(summary, project_root));
    lines
}

pub fn print_archive_output(removed_previous: bool, summary: &ArchiveSummary, project_root: &Path) {
    for line in format_archive_output(removed_previous, summary, project_root) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the dry-run view: resolved source and per-document verdicts.
pub fn format_check_output(
    source_root: Option<&Path>,
    statuses: &[DocStatus],
    freshness: Duration,
    project_root: &Path,
) -> Vec<String> {
    let mut lines = vec!["Source".to_string()];
    match source_root {
        Some(root) if root.is_dir() => lines.push(format!("{}{}", indent(1), root.display())),
        Some(root) => lines.push(format!("{}{} (missing)", indent(1), root.display())),
        None => lines.push(format!("{}(not located)", indent(1))),
    }

    lines.push(String::new());
    lines.push(format!(
        "Documents (freshness window {})",
        format_age(freshness)
    ));
    for status in statuses {
        lines.push(doc_header(status.doc, &status.path, project_root));
        let verdict = match status.staleness {
            s @ Staleness::Fresh { .. } => format!("{s}, would keep"),
            s => format!("{s}, would regenerate"),
        };
        lines.push(format!("{}{}", indent(2), verdict));
    }
    lines
}

pub fn print_check_output(
    source_root: Option<&Path>,
    statuses: &[DocStatus],
    freshness: Duration,
    project_root: &Path,
) {
    for line in format_check_output(source_root, statuses, freshness, project_root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::DocOutcome;
    use std::path::PathBuf;

    fn root() -> PathBuf {
        PathBuf::from("/site")
    }

    fn outcome(doc: DerivedDoc, rel: &str, staleness: Staleness, action: DocAction) -> DocOutcome {
        DocOutcome {
            doc,
            path: root().join(rel),
            staleness,
            action,
        }
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }

    #[test]
    fn display_path_strips_project_root() {
        assert_eq!(
            display_path(Path::new("/site/docs/a.md"), Path::new("/site")),
            "docs/a.md"
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/a.md"), Path::new("/site")),
            "/elsewhere/a.md"
        );
    }

    #[test]
    fn run_output_lists_archive_then_documents() {
        let report = HookReport {
            removed_previous_archive: true,
            archive: ArchiveOutcome::Built(ArchiveSummary {
                path: root().join("docs/playground/jaclang.zip"),
                entries: 2,
                bytes: 300,
            }),
            docs: vec![
                outcome(
                    DerivedDoc::AstReference,
                    "docs/internals/jac_ast.md",
                    Staleness::Missing,
                    DocAction::Regenerated { bytes: 6 },
                ),
                outcome(
                    DerivedDoc::LanguageReference,
                    "docs/learn/jac_ref.md",
                    Staleness::Fresh {
                        age: Duration::from_secs(130),
                    },
                    DocAction::Skipped,
                ),
            ],
        };

        let lines = format_run_output(&report, &root());

        assert_eq!(
            lines,
            vec![
                "Archive",
                "    Removed previous archive",
                "    docs/playground/jaclang.zip (2 entries, 300 B)",
                "",
                "Documents",
                "    AST reference → docs/internals/jac_ast.md",
                "        regenerated, 6 B (was missing)",
                "    language reference → docs/learn/jac_ref.md",
                "        kept, fresh (2m 10s old)",
            ]
        );
    }

    #[test]
    fn run_output_shows_skipped_archive_reason() {
        let report = HookReport {
            removed_previous_archive: false,
            archive: ArchiveOutcome::Skipped {
                reason: "packaging source not found: /opt/jaclang".into(),
            },
            docs: Vec::new(),
        };

        let lines = format_run_output(&report, &root());

        assert_eq!(lines[1], "    Skipped: packaging source not found: /opt/jaclang");
    }

    #[test]
    fn archive_output_single_entry_is_singular() {
        let summary = ArchiveSummary {
            path: root().join("out.zip"),
            entries: 1,
            bytes: 2048,
        };
        let lines = format_archive_output(false, &summary, &root());
        assert_eq!(lines, vec!["Archive", "    out.zip (1 entry, 2.0 KB)"]);
    }

    #[test]
    fn check_output_marks_unlocated_source_and_verdicts() {
        let statuses = vec![
            DocStatus {
                doc: DerivedDoc::AstReference,
                path: root().join("docs/internals/jac_ast.md"),
                staleness: Staleness::Missing,
            },
            DocStatus {
                doc: DerivedDoc::Contributors,
                path: root().join("docs/communityhub/top_contributors.md"),
                staleness: Staleness::Fresh {
                    age: Duration::from_secs(45),
                },
            },
        ];

        let lines = format_check_output(None, &statuses, Duration::from_secs(300), &root());

        assert_eq!(
            lines,
            vec![
                "Source",
                "    (not located)",
                "",
                "Documents (freshness window 5m 00s)",
                "    AST reference → docs/internals/jac_ast.md",
                "        missing, would regenerate",
                "    contributor leaderboard → docs/communityhub/top_contributors.md",
                "        fresh (45s old), would keep",
            ]
        );
    }

    #[test]
    fn check_output_flags_missing_source_directory() {
        let lines = format_check_output(
            Some(Path::new("/definitely/not/here")),
            &[],
            Duration::from_secs(300),
            &root(),
        );
        assert_eq!(lines[1], "    /definitely/not/here (missing)");
    }
}
