//! Human-readable progress lines for a staging run.
//!
//! Progress is kept apart from `tracing` diagnostics: it is the user-facing
//! record of what was staged and goes to stdout.
use std::io::{self, Write};

pub trait ProgressSink {
    fn write_line(&mut self, line: &str);

    fn package(&mut self, name: &str) {
        self.write_line(&format!("Manage assets for package {name}"));
    }

    fn file(&mut self, entry: &str) {
        self.write_line(&format!("  - file {entry}"));
    }

    fn directory(&mut self, entry: &str) {
        let entry = entry.trim_end_matches('/');
        self.write_line(&format!("  - directory {entry}/"));
    }
}

/// Writes progress to stdout.
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn write_line(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{line}") {
            tracing::debug!(%err, "failed to write progress line");
        }
    }
}

/// Collects progress lines in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct BufferedSink {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl ProgressSink for BufferedSink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
