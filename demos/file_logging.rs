//! File logging example
//!
//! Demonstrates a non-debug, file-only logger with a small rotation cap so
//! backups appear after a few hundred entries.
//!
//! Run with: cargo run --example file_logging

use instrumented_log::prelude::*;

fn main() -> Result<()> {
    println!("=== Instrumented Log - File Logging Example ===\n");

    let config = LoggerConfig::new("log/file_logging.log", "file-demo", false).with_rotation(16 * 1024, 5);
    let logger = setup::configure(&config)?;

    println!("1. DEBUG entries are filtered outside debug mode:");
    logger.debug("Loading configuration...");
    logger.info("Application started");
    logger.warn("Using default settings for some options");

    println!("\n2. Writing enough entries to rotate:");
    for i in 1..=1000 {
        logger.info(format!("Processing item {}/1000", i));
    }
    logger.flush()?;

    let metrics = logger.metrics();
    println!(
        "   logged: {}, filtered: {}, dropped: {}",
        metrics.total_logged(),
        metrics.filtered_count(),
        metrics.dropped_count()
    );

    for index in 1..=config.max_backups {
        let backup = format!("{}.{}", config.log_file_path.display(), index);
        if std::path::Path::new(&backup).exists() {
            println!("   backup: {}", backup);
        }
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
