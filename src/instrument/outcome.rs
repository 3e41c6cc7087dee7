//! Results of instrumented calls

use std::error::Error;
use std::fmt;
use std::panic::Location;

/// Source location of the code that invoked an instrumented call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    column: u32,
}

impl CallSite {
    /// Location of the caller of the enclosing `#[track_caller]` function
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The wrapped operation panicked
    Panic,
    /// The wrapped operation returned `Err`
    Error,
}

/// A failure captured and logged by an instrumented call
#[derive(Debug, thiserror::Error)]
#[error("{call_site} - {message}")]
pub struct Failure {
    call_site: CallSite,
    kind: FailureKind,
    message: String,
    stack_trace: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl Failure {
    pub(crate) fn new(
        call_site: CallSite,
        kind: FailureKind,
        message: String,
        stack_trace: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            call_site,
            kind,
            message,
            stack_trace,
            source,
        }
    }

    /// Where the instrumented call was made, not where it failed
    #[must_use]
    pub fn call_site(&self) -> CallSite {
        self.call_site
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Panic message or error display text
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }

    /// The log line recorded for this failure: `"<file>:<line> - <message>"`
    #[must_use]
    pub fn log_line(&self) -> String {
        self.to_string()
    }

    /// Recover the original error of a [`FailureKind::Error`] failure
    pub fn downcast_source<E: Error + 'static>(&self) -> Option<&E> {
        self.source.as_deref().and_then(|e| e.downcast_ref::<E>())
    }
}

/// What an instrumented call produced
///
/// A failing call does not unwind into its caller; it yields
/// [`Outcome::Failed`] after the failure has been logged.
#[derive(Debug)]
#[must_use = "an Outcome may hold a captured failure"]
pub enum Outcome<T> {
    Completed(T),
    Failed(Failure),
}

impl<T> Outcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Failed(failure) => Some(failure),
        }
    }

    /// The value, or `None` on failure
    ///
    /// This view cannot tell a failed call from one that produced nothing;
    /// use [`Outcome::into_result`] when the difference matters.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Completed(value) => Ok(value),
            Outcome::Failed(failure) => Err(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Failed(failure) => Outcome::Failed(failure),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

impl<T> From<Outcome<T>> for Result<T, Failure> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk on fire")]
    struct DiskError;

    fn failure() -> Failure {
        Failure::new(
            CallSite::caller(),
            FailureKind::Error,
            "disk on fire".to_string(),
            "trace".to_string(),
            Some(Box::new(DiskError)),
        )
    }

    #[test]
    fn test_call_site_is_caller() {
        let line = line!() + 1;
        let site = CallSite::caller();
        assert_eq!(site.line(), line);
        assert!(site.file().ends_with("outcome.rs"));
    }

    #[test]
    fn test_failure_display_is_log_line() {
        let failure = failure();
        let expected = format!(
            "{}:{} - disk on fire",
            failure.call_site().file(),
            failure.call_site().line()
        );
        assert_eq!(failure.log_line(), expected);
        assert!(failure.downcast_source::<DiskError>().is_some());
        assert!(Error::source(&failure).is_some());
    }

    #[test]
    fn test_outcome_views() {
        let ok: Outcome<i32> = Outcome::Completed(2);
        assert!(ok.is_completed());
        assert_eq!(ok.map(|v| v * 2).into_option(), Some(4));

        let failed: Outcome<i32> = Outcome::Failed(failure());
        assert!(failed.is_failed());
        assert_eq!(failed.failure().map(Failure::kind), Some(FailureKind::Error));
        assert!(failed.into_result().is_err());

        let failed: Outcome<i32> = Outcome::Failed(failure());
        assert_eq!(failed.unwrap_or(-1), -1);
    }
}
