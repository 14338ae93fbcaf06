//! Report rendering: JSON envelope and plain text.
//!
//! JSON responses always lead with `status` and `schema_version`. Text
//! output prints one line per updated file, one per failed file with its
//! cause, and a final count.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{OutputErrorCode, SweepError};
use crate::sweep::SweepReport;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Successful sweep response.
#[derive(Debug, Serialize)]
pub struct SweepResponse<'a> {
    pub status: &'static str,
    pub schema_version: &'static str,
    #[serde(flatten)]
    pub report: &'a SweepReport,
    pub updated_count: usize,
}

impl<'a> SweepResponse<'a> {
    pub fn new(report: &'a SweepReport) -> Self {
        SweepResponse {
            status: "ok",
            schema_version: SCHEMA_VERSION,
            report,
            updated_count: report.updated_count(),
        }
    }
}

/// Error details for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: u8,
    pub message: String,
}

impl ErrorInfo {
    pub fn from_error(err: &SweepError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// Fatal error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub schema_version: &'static str,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &SweepError) -> Self {
        ErrorResponse {
            status: "error",
            schema_version: SCHEMA_VERSION,
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Write the human-readable report.
pub fn render_text(report: &SweepReport, writer: &mut impl Write) -> io::Result<()> {
    let root = Path::new(&report.root);
    let verb = if report.dry_run { "Would update" } else { "Updated" };

    for file in &report.updated {
        writeln!(writer, "{}: {}", verb, root.join(&file.path).display())?;
        if let Some(diff) = &file.diff {
            write!(writer, "{}", diff)?;
        }
    }

    for failure in &report.failed {
        writeln!(writer, "Failed: {}: {}", root.join(&failure.path).display(), failure.error)?;
    }

    writeln!(writer)?;
    writeln!(writer, "{} {} files", verb, report.updated_count())?;
    if !report.failed.is_empty() {
        writeln!(writer, "Failed {} files", report.failed.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::RuleHit;
    use crate::rules::RuleContext;
    use crate::sweep::{FileFailure, UpdatedFile};

    fn report(dry_run: bool) -> SweepReport {
        SweepReport {
            root: "src".to_string(),
            dry_run,
            scanned: 3,
            updated: vec![UpdatedFile {
                path: "pages/Home.tsx".to_string(),
                substitutions: 2,
                import_added: true,
                hits: vec![RuleHit {
                    context: RuleContext::Equality,
                    key: Some("protein".to_string()),
                    count: 2,
                }],
                diff: dry_run.then(|| "--- a/pages/Home.tsx\n+++ b/pages/Home.tsx\n".to_string()),
            }],
            failed: vec![FileFailure {
                path: "locked.ts".to_string(),
                error: "locked.ts: permission denied".to_string(),
            }],
        }
    }

    #[test]
    fn json_envelope_fields() {
        let report = report(false);
        let mut out = Vec::new();
        emit_response(&SweepResponse::new(&report), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["schema_version"], "1");
        assert_eq!(json["scanned"], 3);
        assert_eq!(json["updated_count"], 1);
        assert_eq!(json["updated"][0]["path"], "pages/Home.tsx");
        assert_eq!(json["updated"][0]["hits"][0]["context"], "equality");
        assert_eq!(json["updated"][0]["hits"][0]["key"], "protein");
        assert!(json["updated"][0].get("diff").is_none());
        assert_eq!(json["failed"][0]["path"], "locked.ts");
    }

    #[test]
    fn error_envelope() {
        let err = SweepError::invalid_args("bad");
        let mut out = Vec::new();
        emit_response(&ErrorResponse::from_error(&err), &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], 2);
        assert_eq!(json["error"]["message"], "invalid arguments: bad");
    }

    #[test]
    fn text_lists_updates_and_count() {
        let mut out = Vec::new();
        render_text(&report(false), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected_path = Path::new("src").join("pages/Home.tsx");
        assert!(text.contains(&format!("Updated: {}\n", expected_path.display())));
        assert!(text.contains("\nUpdated 1 files\n"));
        assert!(text.contains("Failed 1 files\n"));
    }

    #[test]
    fn text_names_each_failure_and_cause() {
        let mut out = Vec::new();
        render_text(&report(false), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected_path = Path::new("src").join("locked.ts");
        assert!(text.contains(&format!(
            "Failed: {}: locked.ts: permission denied\n",
            expected_path.display()
        )));
    }

    #[test]
    fn dry_run_text_includes_diff() {
        let mut out = Vec::new();
        render_text(&report(true), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Would update: "));
        assert!(text.contains("--- a/pages/Home.tsx\n"));
        assert!(text.contains("Would update 1 files\n"));
    }
}
