//! Output formatting for session results

use anyhow::Error;
use colored::*;
use serde_json::json;

use crate::SessionSummary;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "chain": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
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

    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".yellow(), cause);
    }
}

/// Print the session summary in the requested format
pub fn print_summary(summary: &SessionSummary, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "summary": summary,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("Failed to format summary as JSON: {e}"),
        }
        return;
    }

    println!("{}", "Session finished".bold());
    println!("  Episodes:  {}", summary.episodes);
    println!("  Ticks:     {}", summary.ticks);
    if summary.skipped > 0 {
        println!("  Skipped:   {}", summary.skipped.to_string().yellow());
    } else {
        println!("  Skipped:   {}", summary.skipped);
    }
    println!("  Timeouts:  {}", summary.timeouts);
    let ended_by = if summary.server_shutdown {
        "server shutdown".green()
    } else {
        "episode limit".normal()
    };
    println!("  Ended by:  {ended_by}");
}
