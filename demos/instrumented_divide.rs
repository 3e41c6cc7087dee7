//! Instrumented call example
//!
//! Wraps a division in both instrumentation forms. The failing call is
//! logged at ERROR with the location of the call and a stack trace, and
//! the program carries on.
//!
//! Run with: cargo run --example instrumented_divide

use instrumented_log::prelude::*;

fn divide(a: i32, b: i32) -> i32 {
    if b == 0 {
        panic!("division by zero");
    }
    a / b
}

#[derive(Debug, thiserror::Error)]
#[error("cannot divide {0} by zero")]
struct DivisionByZero(i32);

fn checked_divide(a: i32, b: i32) -> std::result::Result<i32, DivisionByZero> {
    a.checked_div(b).ok_or(DivisionByZero(a))
}

fn main() -> Result<()> {
    println!("=== Instrumented Log - Instrumented Divide Example ===\n");

    let config = LoggerConfig::new("log/instrumented_divide.log", "divide", true);
    let logger = setup::get_logger(&config)?;

    println!("1. Bare form, nothing logged unless the call fails:");
    let quiet = Instrument::new(logger.clone()).wrap(divide);
    println!("   4 / 2 = {:?}", quiet.call((4, 2)).into_option());

    println!("\n2. Message form at WARN:");
    let noisy = Instrument::new(logger.clone())
        .message("dividing")
        .level("warn")
        .wrap(divide);
    println!("   9 / 3 = {:?}", noisy.call((9, 3)).into_option());

    println!("\n3. A failing call is logged and reported as an outcome:");
    match noisy.call((4, 0)) {
        Outcome::Completed(value) => println!("   unexpected value {}", value),
        Outcome::Failed(failure) => println!("   captured: {}", failure),
    }

    println!("\n4. Errors returned as Result are handled the same way:");
    let checked = Instrument::new(logger).wrap(checked_divide);
    if let Err(failure) = checked.try_call((7, 0)).into_result() {
        let source = failure.downcast_source::<DivisionByZero>();
        println!("   captured {:?} from {}", source, failure.call_site());
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
