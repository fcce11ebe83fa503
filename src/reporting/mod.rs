//! Error reporting sink
//!
//! Best-effort, non-blocking reporting of failures to an append-only log
//! file. Messages travel through a bounded channel to a single background
//! writer; when the queue is full the message is dropped.

mod channel;

pub use channel::{LogChannel, LogWorker};

use chrono::{SecondsFormat, Utc};

/// Sink for failures seen at the service boundary. Must never block.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: Option<&dyn std::error::Error>, message: &str);
}

/// Reporter that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, _error: Option<&dyn std::error::Error>, _message: &str) {}
}

/// One log line for a reported failure
pub fn format_report(error: Option<&dyn std::error::Error>, message: &str) -> String {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    match error {
        Some(err) => format!("{timestamp} [ERROR] {message} | details: {err}"),
        None => format!("{timestamp} [ERROR] {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn test_format_report_with_details() {
        let err = DomainError::AccountNotFound("42".to_string());
        let line = format_report(Some(&err), "Failed to get balance.");

        assert!(line.contains("[ERROR] Failed to get balance. | details: Account not found: 42"));
    }

    #[test]
    fn test_format_report_without_details() {
        let line = format_report(None, "Failed to split path.");

        assert!(line.ends_with("[ERROR] Failed to split path."));
        assert!(!line.contains("details"));
    }
}
