//! Rotating file appender with size-based rotation
//!
//! The live file is rotated out before a write would take it to the size cap.
//! Backups are named `<file>.1` (newest) through `<file>.<max_backup_files>`
//! (oldest); anything older is deleted.

use crate::core::appender::Appender;
use crate::core::config::{DEFAULT_MAX_BACKUPS, DEFAULT_MAX_BYTES};
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use crate::core::timestamp::TimestampFormat;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Rotation strategy defining when to rotate log files
///
/// # Examples
///
/// ```
/// use instrumented_log::appenders::RotationStrategy;
///
/// let size_strategy = RotationStrategy::size(100 * 1024 * 1024);
/// assert_eq!(size_strategy.max_bytes(), Some(100 * 1024 * 1024));
/// assert_eq!(RotationStrategy::never().max_bytes(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationStrategy {
    /// Rotate before the file would reach `max_bytes`
    Size { max_bytes: u64 },

    /// No rotation
    Never,
}

impl Default for RotationStrategy {
    fn default() -> Self {
        RotationStrategy::Size {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl RotationStrategy {
    #[must_use]
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    #[must_use]
    pub fn never() -> Self {
        RotationStrategy::Never
    }

    #[must_use]
    pub fn max_bytes(&self) -> Option<u64> {
        match self {
            RotationStrategy::Size { max_bytes } => Some(*max_bytes),
            RotationStrategy::Never => None,
        }
    }
}

/// Configuration for rotating file appender
///
/// A policy with `max_backup_files == 0` never rotates: with nowhere to keep
/// a copy, the live file grows past the size cap instead of losing entries.
#[derive(Debug, Clone)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backup_files: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shorthand for `with_strategy(RotationStrategy::Size { max_bytes: size })`
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.strategy = RotationStrategy::Size { max_bytes: size };
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let RotationStrategy::Size { max_bytes: 0 } = self.strategy {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_bytes must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Rotating file appender
///
/// Entries are written as `<timestamp> (<LEVEL>) <message>`; failure entries
/// carry their stack trace on the following lines.
///
/// # Examples
///
/// ```no_run
/// use instrumented_log::appenders::{RotatingFileAppender, RotationPolicy};
///
/// // 10 MiB cap, 5 backups
/// let appender = RotatingFileAppender::new("log/app.log").unwrap();
///
/// let policy = RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(2);
/// let appender = RotatingFileAppender::with_policy("log/small.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    rotation_count: u64,
    timestamp_format: TimestampFormat,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a new rotating file appender with custom policy
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns error if the policy is invalid or the file cannot be opened
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        policy.validate()?;
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_append(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            rotation_count: 0,
            timestamp_format: TimestampFormat::default(),
        })
    }

    /// Use another timestamp rendering for file entries
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a custom pattern chrono cannot render
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Result<Self> {
        format.validate()?;
        self.timestamp_format = format;
        Ok(self)
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Whether writing `incoming` more bytes calls for a rotation first
    fn should_rotate(&self, incoming: u64) -> bool {
        if self.policy.max_backup_files == 0 {
            return false;
        }
        match self.policy.strategy {
            RotationStrategy::Never => false,
            RotationStrategy::Size { max_bytes } => {
                self.current_size > 0 && self.current_size + incoming >= max_bytes
            }
        }
    }

    /// Close, shift backups, reopen
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
            // Writer is dropped here, releasing file handle
        }

        let max = self.policy.max_backup_files;
        let oldest = self.backup_path(max);
        if oldest.exists() {
            if let Err(e) = fs::remove_file(&oldest) {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove oldest backup {}: {}",
                    oldest.display(),
                    e
                );
            }
        }

        for i in (1..max).rev() {
            let old_path = self.backup_path(i);
            if !old_path.exists() {
                continue;
            }
            let new_path = self.backup_path(i + 1);
            if let Err(_first) = fs::rename(&old_path, &new_path) {
                // Some platforms refuse to rename over an existing file
                if new_path.exists() {
                    let _ = fs::remove_file(&new_path);
                }
                fs::rename(&old_path, &new_path).map_err(|e| {
                    LoggerError::file_rotation(
                        old_path.display().to_string(),
                        format!("Failed to rotate backup files: {}", e),
                    )
                })?;
            }
        }

        if self.base_path.exists() {
            fs::rename(&self.base_path, self.backup_path(1)).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        let (file, size) = Self::open_append(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        self.rotation_count += 1;

        Ok(())
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Existing backup files, newest first
    #[must_use]
    pub fn backup_paths(&self) -> Vec<PathBuf> {
        (1..=self.policy.max_backup_files)
            .map(|i| self.backup_path(i))
            .filter(|p| p.exists())
            .collect()
    }

    fn format_entry(&self, entry: &LogEntry) -> String {
        let mut formatted = format!(
            "{} ({}) {}\n",
            self.timestamp_format.format(&entry.timestamp),
            entry.level,
            entry.message
        );
        if let Some(ref trace) = entry.stack_trace {
            for line in trace.lines() {
                formatted.push_str(line);
                formatted.push('\n');
            }
        }
        formatted
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Rotations performed since this appender was opened
    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotation_count
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let formatted = self.format_entry(entry);
        let bytes_written = formatted.len() as u64;

        if self.should_rotate(bytes_written) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    match Self::open_append(&self.base_path) {
                        Ok((file, size)) => {
                            self.writer = Some(BufWriter::new(file));
                            self.current_size = size;
                        }
                        Err(reopen_err) => {
                            eprintln!(
                                "[LOGGER ERROR] Failed to reopen log file after rotation failure: {}",
                                reopen_err
                            );
                            return Err(e);
                        }
                    }
                }

                // Let the file grow past the cap rather than retry on every entry
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(formatted.as_bytes()).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use tempfile::tempdir;

    fn entry(message: String) -> LogEntry {
        LogEntry::new(LogLevel::Info, "test", message)
    }

    #[test]
    fn test_rotation_policy_builder() {
        let policy = RotationPolicy::new().with_max_size(1024).with_max_backups(3);

        assert_eq!(policy.strategy.max_bytes(), Some(1024));
        assert_eq!(policy.max_backup_files, 3);
    }

    #[test]
    fn test_default_policy() {
        let policy = RotationPolicy::default();
        assert_eq!(
            policy.strategy,
            RotationStrategy::Size {
                max_bytes: 10 * 1024 * 1024
            }
        );
        assert_eq!(policy.max_backup_files, 5);
    }

    #[test]
    fn test_zero_size_rejected() {
        let dir = tempdir().unwrap();
        let result = RotatingFileAppender::with_policy(
            dir.path().join("zero.log"),
            RotationPolicy::new().with_max_size(0),
        );
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("deeper").join("app.log");

        let appender = RotatingFileAppender::new(&log_path).unwrap();
        assert_eq!(appender.path(), log_path);
        assert_eq!(appender.current_size(), 0);
        assert!(log_path.exists());
    }

    #[test]
    fn test_entry_format() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("format.log");
        let mut appender = RotatingFileAppender::new(&log_path).unwrap();

        let failure = LogEntry::new(LogLevel::Error, "test", "src/a.rs:3 - boom".to_string())
            .with_stack_trace("frame one\nframe two");
        appender.append(&entry("hello".to_string())).unwrap();
        appender.append(&failure).unwrap();
        appender.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(" (INFO) hello"), "got {:?}", lines[0]);
        assert!(lines[1].ends_with(" (ERROR) src/a.rs:3 - boom"));
        assert_eq!(lines[2], "frame one");
        assert_eq!(lines[3], "frame two");
    }

    #[test]
    fn test_no_rotation_below_cap() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("small.log");
        let policy = RotationPolicy::new().with_max_size(10_000).with_max_backups(5);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..20 {
            appender.append(&entry(format!("Entry {}", i))).unwrap();
        }
        appender.flush().unwrap();

        assert_eq!(appender.rotation_count(), 0);
        assert!(appender.backup_paths().is_empty());
    }

    #[test]
    fn test_log_rotation_size_based() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let policy = RotationPolicy::new().with_max_size(100).with_max_backups(3);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..20 {
            appender
                .append(&entry(format!("Test message number {}", i)))
                .unwrap();
        }
        appender.flush().unwrap();

        assert!(log_path.with_file_name("rotation.log.1").exists());
        assert!(appender.current_size() < 100);
    }

    #[test]
    fn test_backups_capped() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_size(50).with_max_backups(2);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..100 {
            appender.append(&entry(format!("Entry {}", i))).unwrap();
        }
        appender.flush().unwrap();

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap().starts_with("multi.log"))
            .count();

        assert_eq!(log_files, 3); // current + 2 backups
        assert!(!log_path.with_file_name("multi.log.3").exists());
        assert!(appender.rotation_count() > 2);
    }

    #[test]
    fn test_newest_backup_holds_latest_entries() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("order.log");
        let policy = RotationPolicy::new().with_max_size(60).with_max_backups(5);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..3 {
            appender.append(&entry(format!("Entry {}", i))).unwrap();
        }
        appender.flush().unwrap();

        // each line is ~40 bytes, so every entry after the first rotates
        let newest = fs::read_to_string(log_path.with_file_name("order.log.1")).unwrap();
        let oldest = fs::read_to_string(log_path.with_file_name("order.log.2")).unwrap();
        assert!(newest.contains("Entry 1"));
        assert!(oldest.contains("Entry 0"));
        assert!(fs::read_to_string(&log_path).unwrap().contains("Entry 2"));
    }

    #[test]
    fn test_zero_backups_never_rotates() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("keep.log");
        let policy = RotationPolicy::new().with_max_size(60).with_max_backups(0);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..10 {
            appender.append(&entry(format!("Entry {}", i))).unwrap();
        }
        appender.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 10);
        assert!(content.contains("Entry 0"));
        assert!(content.contains("Entry 9"));
        assert_eq!(appender.rotation_count(), 0);
        assert!(!log_path.with_file_name("keep.log.1").exists());
    }

    #[test]
    fn test_never_strategy() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("never.log");
        let policy = RotationPolicy::new()
            .with_strategy(RotationStrategy::Never)
            .with_max_backups(3);
        let mut appender = RotatingFileAppender::with_policy(&log_path, policy).unwrap();

        for i in 0..100 {
            appender.append(&entry(format!("Test message number {}", i))).unwrap();
        }
        appender.flush().unwrap();

        assert!(!log_path.with_file_name("never.log.1").exists());
    }

    #[test]
    fn test_timestamp_format_checked_at_build() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("stamp.log");

        let result = RotatingFileAppender::new(&log_path)
            .unwrap()
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()));
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));

        let mut appender = RotatingFileAppender::new(&log_path)
            .unwrap()
            .with_timestamp_format(TimestampFormat::Custom("%Y".to_string()))
            .unwrap();
        appender.append(&entry("stamped".to_string())).unwrap();
        appender.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.ends_with(" (INFO) stamped\n"));
        assert_eq!(content.split(' ').next().map(str::len), Some(4));
    }

    #[test]
    fn test_existing_file_size_counted() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("existing.log");
        fs::write(&log_path, "previous run\n").unwrap();

        let appender = RotatingFileAppender::new(&log_path).unwrap();
        assert_eq!(appender.current_size(), "previous run\n".len() as u64);
    }
}
