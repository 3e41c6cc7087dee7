//! # Instrumented Log
//!
//! A named logger with a size-rotated file sink and a debug-mode console sink,
//! plus an instrumentation wrapper that logs the failures of wrapped calls
//! together with the location of the call and its stack trace.
//!
//! ## Features
//!
//! - **One call setup**: [`setup::configure`] builds a ready logger from a
//!   [`LoggerConfig`]; a [`LoggerRegistry`] keeps one handle per name
//! - **Rotation**: files are capped at 10 MiB by default with 5 numbered backups
//! - **Instrumentation**: [`instrument::wrap`] and [`instrument::log`] turn a
//!   panic or `Err` into an ERROR entry and an [`Outcome`]
//!
//! ## Example
//!
//! ```no_run
//! use instrumented_log::prelude::*;
//!
//! fn divide(a: i32, b: i32) -> i32 {
//!     a / b
//! }
//!
//! let config = LoggerConfig::new("log/app.log", "app", true);
//! let logger = setup::get_logger(&config)?;
//!
//! let divide = Instrument::new(logger).message("dividing").wrap(divide);
//! if let Outcome::Failed(failure) = divide.call((4, 0)) {
//!     eprintln!("logged: {}", failure);
//! }
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod instrument;
pub mod macros;
pub mod setup;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, TimestampFormat,
    };
    pub use crate::instrument::{
        CallSite, Failure, FailureKind, FailurePolicy, Instrument, Instrumented, Invoke, Outcome,
    };
    pub use crate::setup::{self, LoggerRegistry};
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy, RotationStrategy};
pub use core::{
    Appender, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    Result, TimestampFormat,
};
pub use instrument::{
    CallSite, Failure, FailureKind, FailurePolicy, Instrument, Instrumented, Invoke, Outcome,
};
pub use setup::{configure, default_logger, get_logger, global_registry, LoggerRegistry};
