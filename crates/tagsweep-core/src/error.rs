//! Error types and exit code mapping for tagsweep.
//!
//! The rewrite engine and import resolver are total functions and never
//! produce errors. Everything that can fail lives in the orchestration
//! layer (configuration, constant-table loading, file I/O) and is funneled
//! into [`SweepError`].
//!
//! ## Exit Codes
//!
//! - `2`: Invalid arguments, configuration or constant-table source
//! - `3`: Scan root not found or config file unreadable
//! - `10`: Internal errors
//!
//! Code `4` marks an I/O failure on a single file. A sweep records those
//! per file instead of failing, so the CLI never exits with it; it only
//! shows up in an [`ErrorInfo`](crate::output::ErrorInfo) built from a
//! `Sweeper::process_file` error.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable numeric codes used as process exit codes and in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments or configuration.
    InvalidArguments = 2,
    /// Something the caller pointed at does not exist.
    ResolutionError = 3,
    /// Reading or writing a single file failed. Not a process exit code.
    IoError = 4,
    /// Bugs and unexpected state.
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the sweep and the CLI.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Reading or writing a candidate file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory to scan does not exist or is not a directory.
    #[error("scan root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// The configuration file could not be read or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The constant-table source could not be used to build a category table.
    #[error("cannot load categories from {}: {reason}", path.display())]
    CategorySource { path: PathBuf, reason: String },

    /// Invalid arguments from the caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Result type for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

impl From<&SweepError> for OutputErrorCode {
    fn from(err: &SweepError) -> Self {
        match err {
            SweepError::Io { .. } => OutputErrorCode::IoError,
            SweepError::RootNotFound { .. } => OutputErrorCode::ResolutionError,
            SweepError::Config(ConfigError::Read { .. }) => OutputErrorCode::ResolutionError,
            SweepError::Config(_) => OutputErrorCode::InvalidArguments,
            SweepError::CategorySource { .. } => OutputErrorCode::InvalidArguments,
            SweepError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            SweepError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl SweepError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        SweepError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        SweepError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SweepError::Internal {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
