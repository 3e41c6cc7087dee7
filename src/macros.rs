//! Logging macros for ergonomic log message formatting.
//!
//! The level macros format like `println!` and log on any expression that
//! derefs to a [`Logger`](crate::Logger), including `Arc<Logger>`.
//! [`instrumented!`](crate::instrumented) builds an instrumented function
//! in one line.
//!
//! # Examples
//!
//! ```
//! use instrumented_log::prelude::*;
//! use instrumented_log::info;
//!
//! let logger = Logger::new("app");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use instrumented_log::prelude::*;
/// # let logger = Logger::new("app");
/// use instrumented_log::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use instrumented_log::prelude::*;
/// # let logger = Logger::new("app");
/// use instrumented_log::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use instrumented_log::prelude::*;
/// # let logger = Logger::new("app");
/// use instrumented_log::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use instrumented_log::prelude::*;
/// # let logger = Logger::new("app");
/// use instrumented_log::critical;
/// critical!(logger, "Critical failure: {}", "disk");
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Wrap a function on an `Arc<Logger>` handle.
///
/// ```
/// # use std::sync::Arc;
/// # use instrumented_log::prelude::*;
/// use instrumented_log::instrumented;
///
/// fn divide(a: i32, b: i32) -> i32 {
///     a / b
/// }
///
/// let logger = Arc::new(Logger::new("app"));
/// let bare = instrumented!(logger, divide);
/// let noisy = instrumented!(logger, divide, "dividing", level = "warn");
///
/// assert_eq!(bare.call((4, 2)).into_option(), Some(2));
/// assert_eq!(noisy.level(), LogLevel::Warn);
/// ```
#[macro_export]
macro_rules! instrumented {
    ($logger:expr, $func:expr) => {
        $crate::instrument::Instrument::new(::std::sync::Arc::clone(&$logger)).wrap($func)
    };
    ($logger:expr, $func:expr, $message:expr) => {
        $crate::instrument::Instrument::new(::std::sync::Arc::clone(&$logger))
            .message($message)
            .wrap($func)
    };
    ($logger:expr, $func:expr, $message:expr, level = $level:expr) => {
        $crate::instrument::Instrument::new(::std::sync::Arc::clone(&$logger))
            .message($message)
            .level($level)
            .wrap($func)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, Logger};
    use std::sync::Arc;

    #[test]
    fn test_log_macro() {
        let logger = Logger::new("app");
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        assert_eq!(logger.metrics().total_logged(), 2);
    }

    #[test]
    fn test_level_macros_respect_threshold() {
        let logger = Logger::new("app");
        trace!(logger, "Trace message");
        debug!(logger, "Count: {}", 5);
        info!(logger, "Items: {}", 100);
        warn!(logger, "Retry {} of {}", 1, 3);
        error!(logger, "Code: {}", 500);
        critical!(logger, "Critical failure: {}", "system");

        assert_eq!(logger.metrics().filtered_count(), 2);
        assert_eq!(logger.metrics().total_logged(), 4);
    }

    #[test]
    fn test_macros_on_shared_handle() {
        let logger = Arc::new(Logger::new("shared"));
        info!(logger, "through Arc");
        assert_eq!(logger.metrics().total_logged(), 1);
    }

    #[test]
    fn test_instrumented_macro_forms() {
        let logger = Arc::new(Logger::new("app"));
        let double = |x: i32| x * 2;

        let bare = instrumented!(logger, double);
        assert_eq!(bare.message(), None);
        assert_eq!(bare.call((21,)).into_option(), Some(42));

        let plain = instrumented!(logger, double, "doubling");
        assert_eq!(plain.message(), Some("doubling"));
        assert_eq!(plain.level(), LogLevel::Info);

        let leveled = instrumented!(logger, double, "doubling", level = "critical");
        assert_eq!(leveled.level(), LogLevel::Fatal);
        assert_eq!(leveled.call((1,)).into_option(), Some(2));
    }
}
