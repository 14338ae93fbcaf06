//! Candidate file discovery and text I/O.
//!
//! Walks the scan root and yields files with a selected extension whose
//! root-relative path contains none of the exclusion substrings. Excluded
//! files are filtered before anything reads them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{SweepError, SweepResult};

/// Which files a sweep visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    /// Extensions without the dot, compared exactly.
    pub extensions: Vec<String>,
    /// Substrings of the root-relative path that exclude a file.
    pub exclude: Vec<String>,
}

impl FileSelection {
    /// True if the extension of `path` is selected.
    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// True if `relative` (forward slashes) contains an exclusion substring.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|pattern| relative.contains(pattern.as_str()))
    }
}

/// A file found under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path as reached from the scan root (root joined with the relative path).
    pub path: PathBuf,
    /// Path relative to the scan root, forward slashes.
    pub relative: String,
}

/// Collect candidate files under `root`, sorted by relative path.
///
/// Unreadable directory entries are logged and skipped.
pub fn collect_candidates(root: &Path, selection: &FileSelection) -> SweepResult<Vec<Candidate>> {
    if !root.is_dir() {
        return Err(SweepError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !selection.has_extension(path) {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");
        if selection.is_excluded(&relative) {
            continue;
        }

        candidates.push(Candidate {
            path: path.to_path_buf(),
            relative,
        });
    }

    candidates.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(candidates)
}

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> SweepResult<String> {
    fs::read_to_string(path).map_err(|e| SweepError::io(path, e))
}

/// Replace a file's contents.
pub fn write_text(path: &Path, text: &str) -> SweepResult<()> {
    fs::write(path, text).map_err(|e| SweepError::io(path, e))
}
