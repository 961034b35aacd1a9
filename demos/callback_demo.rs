//! Callback bridge demo
//!
//! Initializes the engine, attaches a callback appender to the root logger,
//! logs one line on logger "test", and prints what the callback received.
//!
//! Run with: cargo run --example callback_demo

use chrono::{DateTime, Local};
use rust_log_bridge::prelude::*;
use std::sync::Arc;

fn to_local_time(secs: u64, micros: u32) -> Option<DateTime<Local>> {
    let secs = i64::try_from(secs).ok()?;
    DateTime::from_timestamp(secs, micros * 1_000).map(|utc| utc.with_timezone(&Local))
}

fn main() -> Result<()> {
    let engine = Engine::new();
    let token = engine.initialize()?;

    let handler: LogEventHandler = Arc::new(|event: &LogEvent<'_>| {
        let when = to_local_time(event.timestamp_secs, event.timestamp_micros)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!("{} [{}] {}", when, event.logger_name, event.message);
    });

    let result = engine
        .attach_callback(None, Some(handler))
        .and_then(|()| {
            engine.log_str(
                Some("test"),
                LogLevel::Info.code(),
                "logged this from a console app through the callback bridge",
            )
        });

    engine.deinitialize(token)?;
    result
}
