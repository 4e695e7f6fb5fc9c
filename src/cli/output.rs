//! Handles the machine-readable output of the CLI.
//!
//! The human-facing report goes to stderr through [`crate::report`]; stdout
//! only ever carries JSON, so it can be piped.

use std::io::{self, Write};

use crate::summary::Summary;

/// Renders the summary as a single-line JSON object.
pub fn summary_json(summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string(summary)
}

/// Prints the summary as JSON on stdout.
pub fn print_summary_json(summary: &Summary) -> io::Result<()> {
    let json = summary_json(summary).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()
}
