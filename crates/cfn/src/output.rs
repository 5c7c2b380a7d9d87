//! Table rendering shared by the commands

use chrono::{DateTime, Utc};
use comfy_table::{Table, presets};
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display settings common to every command
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Omit table header rows
    pub no_headers: bool,
}

impl Output {
    /// Borderless table with `header` unless headers are disabled
    pub fn table<const N: usize>(&self, header: [&str; N]) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::NOTHING);
        if !self.no_headers {
            table.set_header(header);
        }
        table
    }
}

/// Write a table followed by a newline
pub fn write_table(out: &mut impl Write, table: &Table) -> io::Result<()> {
    writeln!(out, "{}", table)
}

/// Timestamp in the CLI's display format
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Optional timestamp, blank when absent
pub fn format_optional_time(time: Option<&DateTime<Utc>>) -> String {
    time.map(format_time).unwrap_or_default()
}
