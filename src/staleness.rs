//! Time-based staleness checks for derived documents.
//!
//! A derived document is regenerated when it is missing or when its
//! modification time is older than the freshness threshold. Nothing about the
//! generator's inputs is consulted: a document written two minutes ago is
//! kept even if the grammar it describes changed one minute ago. This keeps
//! repeated builds during local editing cheap while still refreshing the
//! pages on any build that happens after the window closes.
//!
//! The comparison is strict: a document whose age is exactly the threshold is
//! still fresh.

use std::fmt;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Result of inspecting a derived document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The file does not exist.
    Missing,
    /// The file exists but its modification time could not be read.
    Unknown,
    /// Older than the threshold.
    Stale { age: Duration },
    /// Within the threshold (inclusive).
    Fresh { age: Duration },
}

impl Staleness {
    pub fn is_stale(self) -> bool {
        !matches!(self, Staleness::Fresh { .. })
    }
}

impl fmt::Display for Staleness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staleness::Missing => f.write_str("missing"),
            Staleness::Unknown => f.write_str("unknown age"),
            Staleness::Stale { age } => write!(f, "stale ({} old)", format_age(*age)),
            Staleness::Fresh { age } => write!(f, "fresh ({} old)", format_age(*age)),
        }
    }
}

/// Convert a threshold expressed in minutes into a [`Duration`].
pub fn minutes(threshold_minutes: u64) -> Duration {
    Duration::from_secs(threshold_minutes.saturating_mul(60))
}

/// `true` if `path` is missing or older than `threshold` right now.
pub fn is_stale(path: &Path, threshold: Duration) -> bool {
    check(path, threshold, SystemTime::now()).is_stale()
}

/// Inspect `path` against `threshold` using `now` as the wall clock.
pub fn check(path: &Path, threshold: Duration, now: SystemTime) -> Staleness {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Staleness::Missing,
        Err(_) => return Staleness::Unknown,
    };
    match metadata.modified() {
        Ok(modified) => classify(modified, now, threshold),
        Err(_) => Staleness::Unknown,
    }
}

/// Classify a modification time. Future timestamps count as age zero.
pub fn classify(modified: SystemTime, now: SystemTime, threshold: Duration) -> Staleness {
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    if age > threshold {
        Staleness::Stale { age }
    } else {
        Staleness::Fresh { age }
    }
}

/// Compact age rendering: `42s`, `3m 05s`, `2h 10m`.
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::backdate;
    use std::fs;
    use tempfile::TempDir;

    const FIVE_MINUTES: Duration = Duration::from_secs(300);

    // =========================================================================
    // classify (pure)
    // =========================================================================

    #[test]
    fn older_than_threshold_is_stale() {
        let now = SystemTime::now();
        let modified = now - Duration::from_secs(301);
        assert_eq!(
            classify(modified, now, FIVE_MINUTES),
            Staleness::Stale {
                age: Duration::from_secs(301)
            }
        );
    }

    #[test]
    fn exactly_threshold_is_fresh() {
        let now = SystemTime::now();
        let modified = now - FIVE_MINUTES;
        let result = classify(modified, now, FIVE_MINUTES);
        assert_eq!(result, Staleness::Fresh { age: FIVE_MINUTES });
        assert!(!result.is_stale());
    }

    #[test]
    fn one_nanosecond_past_threshold_is_stale() {
        let now = SystemTime::now();
        let modified = now - FIVE_MINUTES - Duration::from_nanos(1);
        assert!(classify(modified, now, FIVE_MINUTES).is_stale());
    }

    #[test]
    fn future_mtime_is_fresh() {
        let now = SystemTime::now();
        let modified = now + Duration::from_secs(3600);
        assert_eq!(
            classify(modified, now, FIVE_MINUTES),
            Staleness::Fresh {
                age: Duration::ZERO
            }
        );
    }

    #[test]
    fn zero_threshold_keeps_only_same_instant_writes() {
        let now = SystemTime::now();
        assert!(!classify(now, now, Duration::ZERO).is_stale());
        assert!(classify(now - Duration::from_millis(1), now, Duration::ZERO).is_stale());
    }

    // =========================================================================
    // check / is_stale (filesystem)
    // =========================================================================

    #[test]
    fn missing_file_is_stale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope.md");
        assert_eq!(check(&path, FIVE_MINUTES, SystemTime::now()), Staleness::Missing);
        assert!(is_stale(&path, FIVE_MINUTES));
    }

    #[test]
    fn freshly_written_file_is_not_stale() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, "hello").unwrap();
        assert!(!is_stale(&path, FIVE_MINUTES));
    }

    #[test]
    fn two_minute_old_file_is_fresh_under_five_minute_threshold() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, "hello").unwrap();
        backdate(&path, Duration::from_secs(120));
        assert!(!is_stale(&path, minutes(5)));
    }

    #[test]
    fn ten_minute_old_file_is_stale_under_five_minute_threshold() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, "hello").unwrap();
        backdate(&path, Duration::from_secs(600));
        let result = check(&path, minutes(5), SystemTime::now());
        assert!(result.is_stale());
        assert!(matches!(result, Staleness::Stale { age } if age >= Duration::from_secs(600)));
    }

    #[test]
    fn threshold_is_a_parameter() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doc.md");
        fs::write(&path, "hello").unwrap();
        backdate(&path, Duration::from_secs(600));
        assert!(is_stale(&path, minutes(5)));
        assert!(!is_stale(&path, minutes(30)));
    }

    // =========================================================================
    // Display
    // =========================================================================

    #[test]
    fn minutes_converts_to_seconds() {
        assert_eq!(minutes(5), Duration::from_secs(300));
        assert_eq!(minutes(0), Duration::ZERO);
    }

    #[test]
    fn minutes_saturates_instead_of_overflowing() {
        assert_eq!(minutes(u64::MAX), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn format_age_units() {
        assert_eq!(format_age(Duration::from_secs(42)), "42s");
        assert_eq!(format_age(Duration::from_secs(185)), "3m 05s");
        assert_eq!(format_age(Duration::from_secs(7800)), "2h 10m");
    }

    #[test]
    fn staleness_display() {
        assert_eq!(Staleness::Missing.to_string(), "missing");
        assert_eq!(
            Staleness::Fresh {
                age: Duration::from_secs(120)
            }
            .to_string(),
            "fresh (2m 00s old)"
        );
    }
}
