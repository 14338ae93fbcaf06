//! tagsweep - rewrite category string literals into constant-table references.
//!
//! This crate provides the CLI binary.
//!
//! ## Modules
//!
//! - `cli` - Command implementation shared by the binary and tests

pub mod cli;

// Re-export core types for convenience
pub use tagsweep_core::error::{OutputErrorCode, SweepError};
pub use tagsweep_core::output::{ErrorResponse, SweepResponse, SCHEMA_VERSION};
pub use tagsweep_core::sweep::{SweepReport, Sweeper};
