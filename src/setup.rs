//! Logger configuration and per-name handle registry
//!
//! [`configure`] turns a [`LoggerConfig`] into a ready [`Logger`]: a rotating
//! file sink, plus a console sink in debug mode, both behind one threshold.
//! Every call builds a new, unregistered logger.
//!
//! For one handle per logger name use [`get_logger`] or a [`LoggerRegistry`]:
//! repeated requests return the same handle and never stack sinks. The
//! process-wide registry backs [`get_logger`] and [`default_logger`]; tests
//! that want isolation create their own registry.
//!
//! Do not [`configure`] the same log file twice in one process. Each logger
//! owns its file sink, and two sinks on one path rotate independently of
//! each other.

use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
use crate::core::{Logger, LoggerConfig, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Build a logger from `config`, surfacing path and rotation problems now
/// rather than on the first write.
///
/// The logger is not registered: calling this twice with the same name gives
/// two independent loggers. Use [`get_logger`] for the per-name handle.
///
/// # Examples
///
/// ```no_run
/// use instrumented_log::{setup, LoggerConfig};
///
/// let logger = setup::configure(&LoggerConfig::new("log/app.log", "app", false))?;
/// logger.info("service started");
/// # Ok::<(), instrumented_log::LoggerError>(())
/// ```
pub fn configure(config: &LoggerConfig) -> Result<Logger> {
    configure_with_console(config, || ConsoleAppender::new(config.logger_name.as_str()))
}

/// Like [`configure`], with the console sink supplied by the caller. The
/// factory is only called in debug mode.
pub fn configure_with_console(
    config: &LoggerConfig,
    console: impl FnOnce() -> ConsoleAppender,
) -> Result<Logger> {
    config.validate()?;

    let policy = RotationPolicy::new()
        .with_max_size(config.max_bytes)
        .with_max_backups(config.max_backups);
    let file = RotatingFileAppender::with_policy(&config.log_file_path, policy)?;

    let logger = Logger::new(config.logger_name.as_str());
    logger.set_min_level(config.level());
    logger.add_appender(Box::new(file));
    if config.console_enabled() {
        logger.add_appender(Box::new(console()));
    }
    Ok(logger)
}

/// One logger handle per name
#[derive(Default)]
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle registered under `config.logger_name`, configuring it
    /// on first request. Later requests for the same name return the existing
    /// handle unchanged, whatever their other settings.
    pub fn get_or_configure(&self, config: &LoggerConfig) -> Result<Arc<Logger>> {
        self.get_or_configure_with(config, || ConsoleAppender::new(config.logger_name.as_str()))
    }

    pub fn get_or_configure_with(
        &self,
        config: &LoggerConfig,
        console: impl FnOnce() -> ConsoleAppender,
    ) -> Result<Arc<Logger>> {
        // held across configuration so two threads cannot both build sinks for one name
        let mut loggers = self.loggers.lock();
        if let Some(existing) = loggers.get(&config.logger_name) {
            return Ok(Arc::clone(existing));
        }

        let logger = Arc::new(configure_with_console(config, console)?);
        loggers.insert(config.logger_name.clone(), Arc::clone(&logger));
        Ok(logger)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().get(name).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loggers.lock().is_empty()
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

static GLOBAL_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();
static DEFAULT_LOGGER: OnceLock<Arc<Logger>> = OnceLock::new();

/// The process-wide registry
pub fn global_registry() -> &'static LoggerRegistry {
    GLOBAL_REGISTRY.get_or_init(LoggerRegistry::new)
}

/// Process-wide handle for `config.logger_name`
pub fn get_logger(config: &LoggerConfig) -> Result<Arc<Logger>> {
    global_registry().get_or_configure(config)
}

/// The handle used by [`crate::instrument::wrap`] and [`crate::instrument::log`].
///
/// Configured on first use from [`LoggerConfig::from_env`]. If that fails the
/// error is reported on stderr and a handle without sinks is used, so
/// instrumented calls still run.
pub fn default_logger() -> Arc<Logger> {
    Arc::clone(DEFAULT_LOGGER.get_or_init(|| {
        match LoggerConfig::from_env().and_then(|config| get_logger(&config)) {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Default logger configuration failed: {}. \
                     Instrumented calls will not be recorded.",
                    e
                );
                Arc::new(Logger::new(crate::core::config::DEFAULT_LOGGER_NAME))
            }
        }
    }))
}
