//! Basic engine usage example
//!
//! Demonstrates basic configuration, the logger hierarchy, and level
//! inheritance with the console appender.
//!
//! Run with: cargo run --example basic_usage

use rust_log_bridge::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Log Bridge - Basic Usage Example ===\n");

    let engine = Engine::new();
    let token = engine.initialize()?;

    // Console appender on root, root level DEBUG
    engine.configure_basic()?;

    let app = engine.get_logger("app");
    let db = engine.get_logger("app.db");

    println!("1. Logging at different levels (root is DEBUG):");
    db.trace("This is a trace message (hidden)");
    db.debug("This is a debug message");
    db.info("This is an info message");
    db.warn("This is a warning message");
    db.error("This is an error message");
    db.fatal("This is a fatal message");

    println!("\n2. Raising the level of an ancestor:");
    app.set_level(Some(LogLevel::Warn))?;
    println!("   'app' set to WARN - 'app.db' inherits it:");
    db.info("Info message (hidden)");
    db.warn("Warning message (visible)");

    println!("\n3. Overriding on the child:");
    db.set_level(Some(LogLevel::Debug))?;
    db.debug("Debug message (visible again)");

    engine.deinitialize(token)?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
