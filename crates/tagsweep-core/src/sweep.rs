//! File-level orchestration.
//!
//! For each candidate: read, rewrite, and only if something changed, ensure
//! the import and write the result back. A failure on one file is logged
//! and recorded; the batch always runs to completion.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::diff::unified_diff;
use crate::error::SweepResult;
use crate::files::{collect_candidates, read_text, write_text, Candidate, FileSelection};
use crate::imports::ImportResolver;
use crate::rewrite::{rewrite, RuleHit};
use crate::rules::RuleSet;

/// Outcome of processing one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub before: String,
    pub after: String,
    pub changed: bool,
    pub hits: Vec<RuleHit>,
    pub import_added: bool,
}

impl FileRecord {
    /// Total replacements made by the rewrite engine.
    pub fn substitutions(&self) -> usize {
        self.hits.iter().map(|h| h.count).sum()
    }
}

/// A file the sweep rewrote (or would rewrite, in a dry run).
#[derive(Debug, Clone, Serialize)]
pub struct UpdatedFile {
    pub path: String,
    pub substitutions: usize,
    pub import_added: bool,
    pub hits: Vec<RuleHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// A file the sweep could not process.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

/// Summary of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub root: String,
    pub dry_run: bool,
    pub scanned: usize,
    pub updated: Vec<UpdatedFile>,
    pub failed: Vec<FileFailure>,
}

impl SweepReport {
    /// Number of files successfully updated.
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}

/// Rule table plus import resolver; everything needed to process a file.
#[derive(Debug, Clone)]
pub struct Sweeper {
    rules: RuleSet,
    resolver: ImportResolver,
}

impl Sweeper {
    pub fn new(rules: RuleSet, resolver: ImportResolver) -> Self {
        Sweeper { rules, resolver }
    }

    /// Build from configuration; relative paths resolve against `base`.
    pub fn from_config(config: &Config, base: &Path) -> SweepResult<Self> {
        let table = config.category_table(base)?;
        debug!(
            identifier = table.identifier(),
            categories = table.len(),
            "category table loaded"
        );
        Ok(Sweeper::new(
            RuleSet::from_table(&table),
            config.import_resolver(),
        ))
    }

    /// Rewrite `content` as if it lived at `path`. Pure.
    pub fn process_content(&self, path: &Path, content: &str) -> FileRecord {
        let outcome = rewrite(content, &self.rules);
        let (after, import_added) = if outcome.changed {
            let with_import = self.resolver.ensure_import(&outcome.content, path);
            let added = with_import != outcome.content;
            (with_import, added)
        } else {
            (outcome.content, false)
        };
        FileRecord {
            path: path.to_path_buf(),
            before: content.to_string(),
            changed: after != content,
            after,
            hits: outcome.hits,
            import_added,
        }
    }

    /// Read, process and (unless `dry_run`) write one file.
    ///
    /// The import depth is chosen from `path` as given.
    pub fn process_file(&self, path: &Path, dry_run: bool) -> SweepResult<FileRecord> {
        self.process_at(path, path, dry_run)
    }

    /// Like [`Sweeper::process_file`], classifying the import by the
    /// root-relative path so the location of the checkout never matters.
    fn process_candidate(&self, candidate: &Candidate, dry_run: bool) -> SweepResult<FileRecord> {
        self.process_at(&candidate.path, Path::new(&candidate.relative), dry_run)
    }

    fn process_at(&self, path: &Path, layout_path: &Path, dry_run: bool) -> SweepResult<FileRecord> {
        let content = read_text(path)?;
        let mut record = self.process_content(layout_path, &content);
        record.path = path.to_path_buf();
        if record.changed && !dry_run {
            write_text(path, &record.after)?;
        }
        Ok(record)
    }

    /// Process every candidate under `root`.
    ///
    /// Only a missing root is fatal; per-file failures land in the report.
    pub fn run(
        &self,
        root: &Path,
        selection: &FileSelection,
        dry_run: bool,
    ) -> SweepResult<SweepReport> {
        let candidates = collect_candidates(root, selection)?;
        info!(root = %root.display(), files = candidates.len(), dry_run, "sweep started");

        let mut report = SweepReport {
            root: root.display().to_string(),
            dry_run,
            scanned: candidates.len(),
            updated: Vec::new(),
            failed: Vec::new(),
        };

        for candidate in candidates {
            let relative = candidate.relative.clone();
            match self.process_candidate(&candidate, dry_run) {
                Ok(record) if record.changed => {
                    debug!(
                        file = %relative,
                        substitutions = record.substitutions(),
                        import_added = record.import_added,
                        "rewritten"
                    );
                    report.updated.push(UpdatedFile {
                        diff: dry_run.then(|| unified_diff(&relative, &record.before, &record.after)),
                        path: relative,
                        substitutions: record.substitutions(),
                        import_added: record.import_added,
                        hits: record.hits,
                    });
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(file = %relative, error = %err, "failed to process file");
                    report.failed.push(FileFailure {
                        path: relative,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            updated = report.updated_count(),
            failed = report.failed.len(),
            "sweep finished"
        );
        Ok(report)
    }
}
