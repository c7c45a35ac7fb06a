//! Output formatting for CLI responses

use anyhow::Error;
use colored::Colorize;
use serde_json::json;
use stickshape_limiter::prelude::*;

use crate::trace::ReplayRecord;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print replay records, one per line.
///
/// # Errors
///
/// Fails only if a record cannot be serialized.
pub fn print_replay(records: &[ReplayRecord], json: bool) -> serde_json::Result<()> {
    for record in records {
        if json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{}", format_record(record));
        }
    }
    Ok(())
}

/// Human-readable replay line.
pub fn format_record(record: &ReplayRecord) -> String {
    let mut flags = Vec::new();
    if record.lockout_x {
        flags.push("lock-x".to_string());
    }
    if record.lockout_y {
        flags.push("lock-y".to_string());
    }
    if record.sdi != 0 {
        flags.push(format!("sdi={:#04x}", record.sdi));
    }
    match record.pivot {
        PivotDirection::None => {}
        PivotDirection::LeftThenRight => flags.push("pivot=lr".to_string()),
        PivotDirection::RightThenLeft => flags.push("pivot=rl".to_string()),
    }
    if record.jump {
        flags.push("jump".to_string());
    }
    let line = format!(
        "{:>6}  raw {:>3},{:>3}  out {:>3},{:>3}",
        record.sample, record.raw_x, record.raw_y, record.x, record.y
    );
    if flags.is_empty() {
        line
    } else {
        format!("{line}  {}", flags.join(" "))
    }
}

/// Print a configuration as pretty JSON.
///
/// # Errors
///
/// Fails only if the configuration cannot be serialized.
pub fn print_config(config: &LimiterConfig) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Report a configuration that passed validation.
pub fn print_config_ok(path: &str, json: bool) {
    if json {
        println!("{}", json!({ "success": true, "path": path }));
    } else {
        println!("{} {}", "✓".green(), path);
    }
}
