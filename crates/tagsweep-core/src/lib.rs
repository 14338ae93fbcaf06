//! Core of tagsweep.
//!
//! Rewrites string-literal category tags into references to a shared
//! constant table and inserts the import for it:
//! - Category table and substitution rules generated from it
//! - Rewrite engine (pure text → text)
//! - Import path resolution and insertion
//! - Configuration, file discovery and the per-file sweep
//! - JSON and text report output, unified diffs for dry runs

pub mod categories;
pub mod config;
pub mod diff;
pub mod error;
pub mod files;
pub mod imports;
pub mod output;
pub mod rewrite;
pub mod rules;
pub mod sweep;

pub use categories::{Category, CategoryTable};
pub use config::Config;
pub use error::{OutputErrorCode, SweepError, SweepResult};
pub use imports::{ImportLayout, ImportResolver, ImportStatement};
pub use rewrite::{rewrite, RewriteOutcome};
pub use rules::RuleSet;
pub use sweep::{FileRecord, SweepReport, Sweeper};
