//! CLI front door.
//!
//! Loads configuration, applies command-line overrides and runs the sweep.
//! Relative paths (scan root, config file, constant-table source) resolve
//! against the working directory passed in.

use std::path::{Path, PathBuf};

use tagsweep_core::config::Config;
use tagsweep_core::error::SweepError;
use tagsweep_core::sweep::{SweepReport, Sweeper};

/// Options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Scan root; overrides `root` from the config.
    pub root: Option<PathBuf>,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Report without writing.
    pub dry_run: bool,
}

/// Run a sweep from `cwd`.
pub fn run_sweep(options: &SweepOptions, cwd: &Path) -> Result<SweepReport, SweepError> {
    let explicit = options.config.as_ref().map(|p| cwd.join(p));
    let mut config = Config::discover(explicit.as_deref(), cwd)?;
    if let Some(root) = &options.root {
        config.root = root.clone();
    }

    let sweeper = Sweeper::from_config(&config, cwd)?;
    let root = config.root_dir(cwd);
    sweeper.run(&root, &config.selection(), options.dry_run)
}
