//! Main logger implementation

use super::{
    appender::Appender, error::Result, log_entry::LogEntry, log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::{Mutex, RwLock};

/// A named logger: one severity threshold shared by every attached sink.
///
/// Loggers are shared as `Arc<Logger>`; every method takes `&self`. Entries are
/// appended and flushed while holding the appender lock, so a rotating sink
/// never interleaves a rotation with another thread's write.
pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    metrics: LoggerMetrics,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LogLevel::Info),
            appenders: Mutex::new(Vec::new()),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Append and flush an entry on every sink, isolating sink panics
    ///
    /// Returns `true` when at least one sink failed.
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        metrics: &LoggerMetrics,
    ) -> bool {
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)?;
                appender.flush()
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx, panic_msg
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }

        has_error
    }

    /// Attach a sink unless one with the same name is already attached
    ///
    /// Returns `false` when the sink was rejected as a duplicate.
    pub fn add_appender(&self, appender: Box<dyn Appender>) -> bool {
        let mut appenders = self.appenders.lock();
        if appenders.iter().any(|a| a.name() == appender.name()) {
            return false;
        }
        appenders.push(appender);
        true
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    #[must_use]
    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Names of the attached sinks, in attachment order
    #[must_use]
    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn has_appender(&self, name: &str) -> bool {
        self.appenders.lock().iter().any(|a| a.name() == name)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let entry = LogEntry::new(level, self.name.as_str(), message.into());
        self.dispatch(&entry);
    }

    /// Log a prepared entry, applying the threshold
    pub fn log_entry(&self, entry: &LogEntry) {
        if !self.is_enabled(entry.level) {
            self.metrics.record_filtered();
            return;
        }
        self.dispatch(entry);
    }

    /// Log an ERROR entry for a captured failure: `"<file>:<line> - <message>"`
    /// with the stack trace attached.
    pub fn log_failure(&self, file: &str, line: u32, message: &str, stack_trace: &str) {
        self.metrics.record_failure_captured();
        let entry = LogEntry::new(
            LogLevel::Error,
            self.name.as_str(),
            format!("{}:{} - {}", file, line, message),
        )
        .with_location(file, line)
        .with_stack_trace(stack_trace);
        self.log_entry(&entry);
    }

    fn dispatch(&self, entry: &LogEntry) {
        let mut appenders = self.appenders.lock();
        Self::process_sync(&mut appenders, entry, &self.metrics);
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use instrumented_log::Logger;
    ///
    /// let logger = Logger::new("metrics-demo");
    /// logger.debug("below the default INFO threshold");
    /// assert_eq!(logger.metrics().filtered_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use instrumented_log::prelude::*;
    ///
    /// let logger = Logger::builder("app")
    ///     .min_level(LogLevel::Debug)
    ///     .appender(ConsoleAppender::new("app"))
    ///     .build();
    /// assert_eq!(logger.appender_names(), vec!["console".to_string()]);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' shutting down with {} dropped logs (drop rate: {:.2}%)",
                self.name,
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
pub struct LoggerBuilder {
    name: String,
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Info,
            appenders: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Add an appender; duplicates by name are discarded at build time
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new(self.name);
        logger.set_min_level(self.min_level);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}
