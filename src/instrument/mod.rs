//! Instrumentation wrapper
//!
//! [`Instrument`] wraps a function so that each call
//!
//! 1. optionally logs a message at a chosen level,
//! 2. runs the function with the given arguments,
//! 3. on a panic (or an `Err`, through [`Instrumented::try_call`]) logs
//!    `"<file>:<line> - <message>"` at ERROR with the stack trace attached,
//!    where `<file>:<line>` is the code that made the instrumented call.
//!
//! Failures do not unwind into the caller: they come back as
//! [`Outcome::Failed`] once logged. [`FailurePolicy::Propagate`] resumes the
//! panic after logging instead.
//!
//! # Examples
//!
//! ```no_run
//! use instrumented_log::instrument::{self, Outcome};
//!
//! fn divide(a: i32, b: i32) -> i32 {
//!     a / b
//! }
//!
//! // bare form: nothing logged before the call
//! let safe_divide = instrument::wrap(divide);
//! assert_eq!(safe_divide.call((4, 2)).into_option(), Some(2));
//!
//! // message form: "dividing" logged at WARN on every call
//! let noisy_divide = instrument::log("dividing").level("warn").wrap(divide);
//! assert!(matches!(noisy_divide.call((4, 0)), Outcome::Failed(_)));
//! ```

mod invoke;
mod outcome;
mod panic_capture;

pub use invoke::Invoke;
pub use outcome::{CallSite, Failure, FailureKind, Outcome};

use crate::core::{LogLevel, Logger};
use crate::setup::default_logger;
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

/// What an instrumented call does after logging a panic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Return [`Outcome::Failed`]
    #[default]
    Swallow,
    /// Resume the panic in the caller
    Propagate,
}

/// Builder for instrumented functions, bound to one logger handle
#[derive(Clone)]
pub struct Instrument {
    logger: Arc<Logger>,
    message: Option<String>,
    level: LogLevel,
    policy: FailurePolicy,
}

impl Instrument {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            message: None,
            level: LogLevel::Info,
            policy: FailurePolicy::Swallow,
        }
    }

    /// Bound to [`default_logger`]
    pub fn with_default_logger() -> Self {
        Self::new(default_logger())
    }

    /// Message logged before every call
    #[must_use = "builder methods return a new value"]
    pub fn message(mut self, message: impl Display) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Level of the pre-call message, by verb name. Names that are not a
    /// logging verb resolve to INFO; this never fails.
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, name: &str) -> Self {
        self.level = LogLevel::from_verb(name);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn at(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn wrap<F>(&self, func: F) -> Instrumented<F> {
        Instrumented {
            func,
            message: self.message.clone(),
            level: self.level,
            policy: self.policy,
            logger: Arc::clone(&self.logger),
        }
    }
}

/// Bare form on the default logger: failures logged, no pre-call message
pub fn wrap<F>(func: F) -> Instrumented<F> {
    Instrument::with_default_logger().wrap(func)
}

/// Message form on the default logger; the level defaults to `"info"`
pub fn log(message: impl Display) -> Instrument {
    Instrument::with_default_logger().message(message)
}

/// A wrapped function. Calls take the arguments as a tuple:
/// `f.call(())`, `f.call((x,))`, `f.call((a, b))`.
#[derive(Clone)]
pub struct Instrumented<F> {
    func: F,
    message: Option<String>,
    level: LogLevel,
    policy: FailurePolicy,
    logger: Arc<Logger>,
}

impl<F> Instrumented<F> {
    /// Call the wrapped function, logging a panic instead of unwinding
    ///
    /// The failure entry names the location of this call.
    ///
    /// # Panics
    ///
    /// Re-panics after logging when the policy is [`FailurePolicy::Propagate`].
    #[track_caller]
    pub fn call<Args>(&self, args: Args) -> Outcome<F::Output>
    where
        F: Invoke<Args>,
    {
        self.call_from(CallSite::caller(), args)
    }

    /// Call a function returning `Result`, treating `Err` like a panic
    ///
    /// The error is logged and handed back inside the [`Failure`], see
    /// [`Failure::downcast_source`].
    #[track_caller]
    pub fn try_call<Args, T, E>(&self, args: Args) -> Outcome<T>
    where
        F: Invoke<Args, Output = Result<T, E>>,
        E: Error + Send + Sync + 'static,
    {
        let call_site = CallSite::caller();
        match self.call_from(call_site, args) {
            Outcome::Completed(Ok(value)) => Outcome::Completed(value),
            Outcome::Completed(Err(error)) => {
                let failure = Failure::new(
                    call_site,
                    FailureKind::Error,
                    error.to_string(),
                    error_trace(&error),
                    Some(Box::new(error)),
                );
                self.record(&failure);
                Outcome::Failed(failure)
            }
            Outcome::Failed(failure) => Outcome::Failed(failure),
        }
    }

    fn call_from<Args>(&self, call_site: CallSite, args: Args) -> Outcome<F::Output>
    where
        F: Invoke<Args>,
    {
        match panic_capture::catch(|| {
            if let Some(ref message) = self.message {
                self.logger.log(self.level, message.as_str());
            }
            self.func.invoke(args)
        }) {
            Ok(value) => Outcome::Completed(value),
            Err(caught) => {
                let failure = Failure::new(
                    call_site,
                    FailureKind::Panic,
                    caught.record.message.clone(),
                    caught.record.stack_trace(),
                    None,
                );
                self.record(&failure);
                if self.policy == FailurePolicy::Propagate {
                    caught.resume();
                }
                Outcome::Failed(failure)
            }
        }
    }

    fn record(&self, failure: &Failure) {
        let site = failure.call_site();
        self.logger
            .log_failure(site.file(), site.line(), failure.message(), failure.stack_trace());
    }

    /// Level of the pre-call message
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// The wrapped function, uninstrumented
    pub fn inner(&self) -> &F {
        &self.func
    }
}

/// Error chain followed by the backtrace at the wrapper boundary
fn error_trace(error: &(dyn Error + 'static)) -> String {
    let mut trace = format!("Error: {}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        trace.push_str(&format!("\nCaused by: {}", cause));
        source = cause.source();
    }
    format!("{}\n{}", Backtrace::force_capture().to_string().trim_end(), trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Appender, LogEntry, Result as LogResult};
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<LogEntry>>>);

    impl Recorded {
        fn entries(&self) -> Vec<LogEntry> {
            self.0.lock().clone()
        }
    }

    impl Appender for Recorded {
        fn append(&mut self, entry: &LogEntry) -> LogResult<()> {
            self.0.lock().push(entry.clone());
            Ok(())
        }

        fn flush(&mut self) -> LogResult<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recorded"
        }
    }

    fn recorded_logger() -> (Arc<Logger>, Recorded) {
        let sink = Recorded::default();
        let logger = Logger::builder("test")
            .min_level(LogLevel::Debug)
            .appender(sink.clone())
            .build();
        (Arc::new(logger), sink)
    }

    fn divide(a: i32, b: i32) -> i32 {
        if b == 0 {
            panic!("division by zero");
        }
        a / b
    }

    #[derive(Debug, thiserror::Error)]
    #[error("division by zero")]
    struct DivisionByZero;

    fn checked_divide(a: i32, b: i32) -> Result<i32, DivisionByZero> {
        a.checked_div(b).ok_or(DivisionByZero)
    }

    #[test]
    fn test_bare_form_success_logs_nothing() {
        let (logger, sink) = recorded_logger();
        let wrapped = Instrument::new(logger).wrap(divide);

        assert_eq!(wrapped.call((4, 2)).into_option(), Some(2));
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_message_form_logs_at_requested_level() {
        let (logger, sink) = recorded_logger();
        let wrapped = Instrument::new(logger)
            .message("dividing")
            .level("warning")
            .wrap(divide);

        assert_eq!(wrapped.call((9, 3)).into_option(), Some(3));

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert_eq!(entries[0].message, "dividing");
    }

    #[test]
    fn test_unknown_level_falls_back_to_info() {
        let (logger, sink) = recorded_logger();
        for name in ["shout", "trace", "notset", ""] {
            let wrapped = Instrument::new(Arc::clone(&logger))
                .message(name)
                .level(name)
                .wrap(divide);
            assert_eq!(wrapped.level(), LogLevel::Info);
            assert!(wrapped.call((1, 1)).is_completed());
        }

        assert!(sink.entries().iter().all(|e| e.level == LogLevel::Info));
        assert_eq!(sink.entries().len(), 4);
    }

    #[test]
    fn test_panic_logged_with_call_site() {
        let (logger, sink) = recorded_logger();
        let wrapped = Instrument::new(logger).message("dividing").wrap(divide);

        let line = line!() + 1;
        let outcome = wrapped.call((4, 0));

        let failure = outcome.failure().expect("call should fail");
        assert_eq!(failure.kind(), FailureKind::Panic);
        assert_eq!(failure.call_site().line(), line);
        assert!(failure.call_site().file().ends_with("mod.rs"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Info);
        let error = &entries[1];
        assert_eq!(error.level, LogLevel::Error);
        assert_eq!(
            error.message,
            format!("{}:{} - division by zero", failure.call_site().file(), line)
        );
        assert!(error
            .stack_trace
            .as_deref()
            .unwrap()
            .contains("division by zero"));
    }

    #[test]
    fn test_try_call_logs_err() {
        let (logger, sink) = recorded_logger();
        let wrapped = Instrument::new(logger).wrap(checked_divide);

        assert_eq!(wrapped.try_call((8, 2)).into_option(), Some(4));
        assert!(sink.entries().is_empty());

        let outcome = wrapped.try_call((8, 0));
        let failure = outcome.failure().expect("call should fail");
        assert_eq!(failure.kind(), FailureKind::Error);
        assert!(failure.downcast_source::<DivisionByZero>().is_some());

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].message.ends_with(" - division by zero"));
        assert!(entries[0]
            .stack_trace
            .as_deref()
            .unwrap()
            .contains("Error: division by zero"));
    }

    #[test]
    fn test_propagate_policy_resumes_panic() {
        let (logger, sink) = recorded_logger();
        let wrapped = Instrument::new(logger)
            .policy(FailurePolicy::Propagate)
            .wrap(divide);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| wrapped.call((1, 0))));

        assert!(result.is_err());
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
    }

    #[test]
    fn test_wrapped_closure_reused() {
        let (logger, sink) = recorded_logger();
        let counter = Arc::new(Mutex::new(0));
        let counted = Arc::clone(&counter);
        let wrapped = Instrument::new(logger)
            .message("tick")
            .level("debug")
            .wrap(move || {
                *counted.lock() += 1;
            });

        for _ in 0..3 {
            assert!(wrapped.call(()).is_completed());
        }

        assert_eq!(*counter.lock(), 3);
        assert_eq!(sink.entries().len(), 3);
        assert!(sink.entries().iter().all(|e| e.level == LogLevel::Debug));
    }

    #[test]
    fn test_pre_call_message_below_threshold() {
        let sink = Recorded::default();
        let logger = Arc::new(Logger::builder("quiet").appender(sink.clone()).build());
        let wrapped = Instrument::new(logger).message("hidden").level("debug").wrap(divide);

        assert!(wrapped.call((1, 0)).is_failed());

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Error);
    }
}
