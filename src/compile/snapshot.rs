//! Snapshot rotation
//!
//! A snapshot destination receives each run in a fresh subdirectory named
//! `<snap_base><suffix>`, hard-linked against the previous run through the
//! `last` symlink. The suffix is either a timestamp or an ordinal.
//!
//! The ordinal is the number of existing entries sharing the base name, so
//! two runs racing on one destination (or a deletion between count and
//! transfer) can produce the same name. That behavior is kept as is.

use std::fs;
use std::path::Path;

use super::clock::Clock;
use crate::catalog::{params, Site};

pub const DEFAULT_SNAP_BASE: &str = "default.";
pub const DATE_EXTENSION: &str = "date";
pub const LAST_LINK: &str = "last";

/// Paths derived for one snapshot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTarget {
    pub name: String,
    /// `<dest>/<name>`, the effective transfer destination
    pub dir: String,
    /// `<dest>/last`, the link-dest reference and rotated symlink
    pub last: String,
}

/// Returned when `snap_base` would escape the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSnapBase(pub String);

impl SnapshotTarget {
    pub fn for_site(site: &Site, clock: &dyn Clock) -> Result<Self, InvalidSnapBase> {
        let base = match site.param(params::SNAP_BASE) {
            Some(base) if base.contains('/') => return Err(InvalidSnapBase(base.to_string())),
            Some(base) if !base.is_empty() => base,
            _ => DEFAULT_SNAP_BASE,
        };

        let dest = site.destination.path_spec();
        let suffix = match site.param(params::SNAP_EXTENSION) {
            Some(ext) if ext.eq_ignore_ascii_case(DATE_EXTENSION) => clock.snapshot_stamp(),
            _ => count_snapshots(Path::new(dest), base).to_string(),
        };
        let name = format!("{}{}", base, suffix);

        Ok(Self {
            dir: join(dest, &name),
            last: join(dest, LAST_LINK),
            name,
        })
    }
}

/// Non-symlink direct children of `dir` whose names start with `base`,
/// compared case-insensitively. A missing directory counts as empty.
pub fn count_snapshots(dir: &Path, base: &str) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let base = base.to_lowercase();
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_symlink()))
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .starts_with(&base)
        })
        .count()
}

fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_does_not_double_slashes() {
        assert_eq!(join("/backup/", "last"), "/backup/last");
        assert_eq!(join("/backup", "last"), "/backup/last");
    }

    #[test]
    fn counts_matching_entries_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("daily.0")).unwrap();
        fs::create_dir(dir.path().join("DAILY.1")).unwrap();
        fs::write(dir.path().join("daily.notes"), "").unwrap();
        fs::create_dir(dir.path().join("weekly.0")).unwrap();

        assert_eq!(count_snapshots(dir.path(), "daily."), 3);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("daily.0")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("daily.0"), dir.path().join("daily.last"))
            .unwrap();

        assert_eq!(count_snapshots(dir.path(), "daily."), 1);
    }

    #[test]
    fn missing_directory_counts_zero() {
        assert_eq!(count_snapshots(Path::new("/no/such/dir"), "daily."), 0);
    }
}
