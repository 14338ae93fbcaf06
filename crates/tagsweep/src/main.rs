//! Binary entry point for the tagsweep CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Rewrite every .ts/.tsx file under src/ in place
//! tagsweep
//!
//! # Preview against another root, with diffs
//! tagsweep app/src --dry-run
//!
//! # Machine-readable report
//! tagsweep --format json
//! ```
//!
//! Per-file failures are reported but never change the exit code; only
//! setup errors (bad config, missing root) exit non-zero.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use tagsweep::cli::{run_sweep, SweepOptions};
use tagsweep_core::error::{OutputErrorCode, SweepError};
use tagsweep_core::output::{emit_response, render_text, ErrorResponse, SweepResponse};

/// Replace category string literals with references to a shared constant table.
#[derive(Parser, Debug)]
#[command(name = "tagsweep", version, about)]
struct Cli {
    /// Directory to scan (default: `root` from config, else `src`).
    root: Option<PathBuf>,

    /// Configuration file (default: ./tagsweep.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report what would change without writing files.
    #[arg(long)]
    dry_run: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log level for tracing output.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per updated file and a final count.
    #[default]
    Text,
    /// Full JSON report.
    Json,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.log_level);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            match cli.format {
                OutputFormat::Json => {
                    let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                }
                OutputFormat::Text => eprintln!("error: {}", err),
            }
            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run the sweep and print the report.
fn execute(cli: &Cli) -> Result<(), SweepError> {
    let cwd = std::env::current_dir()
        .map_err(|e| SweepError::internal(format!("cannot determine working directory: {}", e)))?;
    let options = SweepOptions {
        root: cli.root.clone(),
        config: cli.config.clone(),
        dry_run: cli.dry_run,
    };

    let report = run_sweep(&options, &cwd)?;

    let mut stdout = io::stdout();
    let written = match cli.format {
        OutputFormat::Json => emit_response(&SweepResponse::new(&report), &mut stdout),
        OutputFormat::Text => render_text(&report, &mut stdout),
    };
    written.map_err(|e| SweepError::internal(format!("failed to write report: {}", e)))
}
