//! Basic logger usage example
//!
//! Demonstrates a debug-mode logger: DEBUG threshold, file plus console.
//!
//! Run with: cargo run --example basic_usage

use instrumented_log::prelude::*;
use instrumented_log::{debug, info};

fn main() -> Result<()> {
    println!("=== Instrumented Log - Basic Usage Example ===\n");

    let config = LoggerConfig::new("log/basic_usage.log", "basic", true);
    let logger = setup::get_logger(&config)?;

    // Log messages at different levels
    println!("1. Logging at different levels:");
    logger.trace("This is a trace message (below DEBUG, hidden)");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.critical("This is a critical message");

    println!("\n2. Logging with format arguments:");
    let items = 3;
    debug!(logger, "Processing {} items", items);
    info!(logger, "Processed {} of {} items", items, items);

    println!("\n3. Asking for the same name again returns the same handle:");
    let again = setup::get_logger(&config)?;
    println!("   same handle: {}", std::sync::Arc::ptr_eq(&logger, &again));

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the file output", config.log_file_path.display());

    Ok(())
}
