//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub logger_name: String,
    pub timestamp: DateTime<Local>,
    pub file: Option<String>,
    pub line: Option<u32>,
    /// Formatted stack trace attached to failure entries, printed below the entry line
    pub stack_trace: Option<String>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one entry always renders as one line. Stack traces are the only
    /// multi-line part of an entry and are kept apart in `stack_trace`.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, logger_name: impl Into<String>, message: String) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message),
            logger_name: logger_name.into(),
            timestamp: Local::now(),
            file: None,
            line: None,
            stack_trace: None,
        }
    }

    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    pub fn with_stack_trace(mut self, trace: impl Into<String>) -> Self {
        self.stack_trace = Some(trace.into());
        self
    }
}
