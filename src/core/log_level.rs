//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Resolve a logging verb such as `"info"` or `"warning"` to a level.
    ///
    /// Verbs are the names a logger exposes as logging methods. Anything else,
    /// including names that parse as a level but have no verb (`"trace"`,
    /// `"notset"`), resolves to [`LogLevel::Info`]. Never fails.
    ///
    /// ```
    /// use instrumented_log::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_verb("warning"), LogLevel::Warn);
    /// assert_eq!(LogLevel::from_verb("exception"), LogLevel::Error);
    /// assert_eq!(LogLevel::from_verb("trace"), LogLevel::Info);
    /// assert_eq!(LogLevel::from_verb("shout"), LogLevel::Info);
    /// ```
    #[must_use]
    pub fn from_verb(verb: &str) -> Self {
        Self::verb(verb).unwrap_or(LogLevel::Info)
    }

    /// Strict verb lookup; `None` when the name is not a logging verb.
    ///
    /// Verbs are matched exactly: `"WARNING"` or `" debug "` are not verbs.
    #[must_use]
    pub fn verb(verb: &str) -> Option<Self> {
        match verb {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" | "exception" => Some(LogLevel::Error),
            "critical" | "fatal" => Some(LogLevel::Fatal),
            _ => None,
        }
    }

    /// Threshold used by a configured logger: DEBUG in debug mode, INFO otherwise.
    #[must_use]
    pub fn threshold(debug: bool) -> Self {
        if debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    #[cfg(feature = "color")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` so width specifiers such as `{:<6}` apply
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" | "NOTSET" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" | "CRITICAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
