// crates/company-directory-server/src/audit.rs
// ============================================================================
// Module: Directory Audit Logging
// Description: Structured audit events for HTTP request handling.
// Purpose: Emit one JSON-lines record per request without a logging framework.
// Dependencies: company-directory-core, serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the request audit payload and the sinks that write
//! it. Events carry labels and timings only; request bodies and names are
//! never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use company_directory_core::LanguageCode;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Request outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The operation succeeded.
    Ok,
    /// The operation failed.
    Error,
}

/// Directory request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Operation label (for example, `search_by_tag`).
    pub operation: &'static str,
    /// Language the response was rendered in.
    pub language: LanguageCode,
    /// HTTP status code returned.
    pub status: u16,
    /// Request outcome.
    pub outcome: RequestOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Handling latency in milliseconds.
    pub latency_ms: u128,
}

/// Inputs required to construct an audit event.
pub struct DirectoryAuditEventParams {
    /// Operation label.
    pub operation: &'static str,
    /// Language the response was rendered in.
    pub language: LanguageCode,
    /// HTTP status code returned.
    pub status: u16,
    /// Normalized error kind label; `None` on success.
    pub error_kind: Option<&'static str>,
    /// Handling latency in milliseconds.
    pub latency_ms: u128,
}

impl DirectoryAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: DirectoryAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        let outcome =
            if params.error_kind.is_some() { RequestOutcome::Error } else { RequestOutcome::Ok };
        Self {
            event: "directory_request",
            timestamp_ms,
            operation: params.operation,
            language: params.language,
            status: params.status,
            outcome,
            error_kind: params.error_kind,
            latency_ms: params.latency_ms,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for directory request events.
pub trait DirectoryAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &DirectoryAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl DirectoryAuditSink for StderrAuditSink {
    fn record(&self, event: &DirectoryAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl DirectoryAuditSink for FileAuditSink {
    fn record(&self, event: &DirectoryAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl DirectoryAuditSink for NoopAuditSink {
    fn record(&self, _event: &DirectoryAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only audit assertions."
    )]

    use std::fs;

    use company_directory_core::LanguageCode;

    use super::DirectoryAuditEvent;
    use super::DirectoryAuditEventParams;
    use super::DirectoryAuditSink;
    use super::FileAuditSink;
    use super::RequestOutcome;

    fn event(error_kind: Option<&'static str>) -> DirectoryAuditEvent {
        DirectoryAuditEvent::new(DirectoryAuditEventParams {
            operation: "delete_tag",
            language: LanguageCode::Ko,
            status: if error_kind.is_some() { 400 } else { 200 },
            error_kind,
            latency_ms: 3,
        })
    }

    #[test]
    fn outcome_follows_error_kind() {
        assert_eq!(event(None).outcome, RequestOutcome::Ok);
        assert_eq!(event(Some("business_rule")).outcome, RequestOutcome::Error);
    }

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileAuditSink::new(&path).unwrap();
        sink.record(&event(None));
        sink.record(&event(Some("business_rule")));

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> =
            contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "directory_request");
        assert_eq!(lines[0]["operation"], "delete_tag");
        assert_eq!(lines[0]["language"], "ko");
        assert_eq!(lines[0]["outcome"], "ok");
        assert!(lines[0]["error_kind"].is_null());
        assert_eq!(lines[1]["status"], 400);
        assert_eq!(lines[1]["error_kind"], "business_rule");
    }
}
