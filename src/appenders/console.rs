//! Console appender implementation
//!
//! Live-debugging output: `<logger name>: <LEVEL> <message>`, no timestamp.

use crate::core::{Appender, LogEntry, Result};
#[cfg(feature = "color")]
use colored::Colorize;
use std::io::{IsTerminal, Write};

pub struct ConsoleAppender {
    logger_name: String,
    #[cfg_attr(not(feature = "color"), allow(dead_code))]
    use_colors: bool,
    writer: Box<dyn Write + Send + Sync>,
}

impl ConsoleAppender {
    /// Console sink on stderr; colors are enabled when stderr is a terminal
    pub fn new(logger_name: impl Into<String>) -> Self {
        Self {
            logger_name: logger_name.into(),
            use_colors: std::io::stderr().is_terminal(),
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Console sink writing to any stream, without colors
    ///
    /// # Example
    ///
    /// ```
    /// use instrumented_log::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_writer("app", std::io::stdout());
    /// ```
    pub fn with_writer(
        logger_name: impl Into<String>,
        writer: impl Write + Send + Sync + 'static,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            use_colors: false,
            writer: Box::new(writer),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn format_text(&self, entry: &LogEntry) -> String {
        let level_str = format!("{:<6}", entry.level);
        #[cfg(feature = "color")]
        let level_str = if self.use_colors {
            level_str.color(entry.level.color_code()).to_string()
        } else {
            level_str
        };

        let mut output = format!("{:<6}: {} {}\n", self.logger_name, level_str, entry.message);
        if let Some(ref trace) = entry.stack_trace {
            for line in trace.lines() {
                output.push_str(line);
                output.push('\n');
            }
        }
        output
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_text(entry);
        self.writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_format() {
        let out = Captured::default();
        let mut appender = ConsoleAppender::with_writer("app", out.clone());

        appender
            .append(&LogEntry::new(LogLevel::Info, "app", "dividing".to_string()))
            .unwrap();

        let text = String::from_utf8(out.0.lock().clone()).unwrap();
        assert_eq!(text, "app   : INFO   dividing\n");
    }

    #[test]
    fn test_long_name_not_truncated() {
        let out = Captured::default();
        let mut appender = ConsoleAppender::with_writer("Your Log", out.clone());

        appender
            .append(&LogEntry::new(LogLevel::Warn, "Your Log", "careful".to_string()))
            .unwrap();

        let text = String::from_utf8(out.0.lock().clone()).unwrap();
        assert_eq!(text, "Your Log: WARN   careful\n");
    }

    #[test]
    fn test_stack_trace_lines_follow_entry() {
        let out = Captured::default();
        let mut appender = ConsoleAppender::with_writer("app", out.clone());

        let entry = LogEntry::new(LogLevel::Error, "app", "x.rs:1 - boom".to_string())
            .with_stack_trace("at frame 0\nat frame 1");
        appender.append(&entry).unwrap();

        let text = String::from_utf8(out.0.lock().clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with("at frame 1\n"));
    }
}
