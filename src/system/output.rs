// src/system/output.rs

use crate::models::StreamOrigin;
use colored::Colorize;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// The channel through which commands and launched processes report output.
///
/// Every line produced by a command or a child process goes through `emit`;
/// failures go through `error`. Implementations are shared with the stream
/// reader threads, hence `Send + Sync`.
pub trait OutputSink: Send + Sync {
    fn emit(&self, line: &str, origin: StreamOrigin);

    fn error(&self, message: &str, cause: Option<&anyhow::Error>);

    /// Shorthand for a line on stdout.
    fn println(&self, line: &str) {
        self.emit(line, StreamOrigin::Stdout);
    }
}

/// Shared, dynamically typed sink handed to commands and launcher threads.
pub type SharedSink = Arc<dyn OutputSink>;

/// Writes to the terminal, colouring errors.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, line: &str, origin: StreamOrigin) {
        // Broken pipes (e.g. `wekaenv list | head`) are not worth reporting.
        let _ = match origin {
            StreamOrigin::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            StreamOrigin::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }

    fn error(&self, message: &str, cause: Option<&anyhow::Error>) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}: {}", "Error".red().bold(), message);
        if let Some(cause) = cause {
            for source in cause.chain() {
                let text = source.to_string();
                if text != message {
                    let _ = writeln!(err, "  {} {}", "caused by:".dimmed(), text);
                }
            }
        }
    }
}

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedOutput {
    Line { text: String, origin: StreamOrigin },
    Error { message: String, cause: Option<String> },
}

/// Collects everything in memory; used by embedding front-ends and tests.
#[derive(Debug, Default)]
pub struct CaptureSink {
    events: Mutex<Vec<CapturedOutput>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink and its shared handle in one go.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn events(&self) -> Vec<CapturedOutput> {
        self.lock().clone()
    }

    /// All lines emitted on the given stream, in arrival order.
    pub fn lines(&self, origin: StreamOrigin) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                CapturedOutput::Line { text, origin: o } if *o == origin => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn stdout(&self) -> Vec<String> {
        self.lines(StreamOrigin::Stdout)
    }

    pub fn stderr(&self) -> Vec<String> {
        self.lines(StreamOrigin::Stderr)
    }

    /// Reported error messages, without their causes.
    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                CapturedOutput::Error { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether any line or error contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|event| match event {
            CapturedOutput::Line { text, .. } => text.contains(needle),
            CapturedOutput::Error { message, cause } => {
                message.contains(needle) || cause.as_deref().is_some_and(|c| c.contains(needle))
            }
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedOutput>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutputSink for CaptureSink {
    fn emit(&self, line: &str, origin: StreamOrigin) {
        self.lock().push(CapturedOutput::Line {
            text: line.to_string(),
            origin,
        });
    }

    fn error(&self, message: &str, cause: Option<&anyhow::Error>) {
        self.lock().push(CapturedOutput::Error {
            message: message.to_string(),
            cause: cause.map(|c| format!("{c:#}")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_capture_sink_separates_streams() {
        let sink = CaptureSink::new();
        sink.emit("A", StreamOrigin::Stdout);
        sink.emit("B", StreamOrigin::Stderr);
        sink.println("C");

        assert_eq!(sink.stdout(), vec!["A", "C"]);
        assert_eq!(sink.stderr(), vec!["B"]);
        assert!(sink.errors().is_empty());
    }

    #[test]
    fn test_capture_sink_records_error_cause() {
        let sink = CaptureSink::new();
        let cause = anyhow!("disk full").context("Failed to save 'envA'");
        sink.error("create failed", Some(&cause));

        assert_eq!(sink.errors(), vec!["create failed"]);
        assert!(sink.contains("disk full"));
        assert_eq!(
            sink.events(),
            vec![CapturedOutput::Error {
                message: "create failed".to_string(),
                cause: Some("Failed to save 'envA': disk full".to_string()),
            }]
        );
    }
}
