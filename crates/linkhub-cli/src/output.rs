//! Rendering of command results as tables, key/value blocks or JSON.
//!
//! JSON mode writes exactly one document to stdout so the output can be piped
//! into other tools; status lines are only printed in table mode.

use serde::Serialize;
use tabled::{Table, Tabled};

use linkhub_core::error::AppError;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Writes command results in one [`OutputFormat`].
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Rows as a table, or a JSON array.
    pub fn rows<T: Serialize + Tabled>(&self, rows: &[T], empty: &str) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
            OutputFormat::Table if rows.is_empty() => println!("{empty}"),
            OutputFormat::Table => println!("{}", Table::new(rows)),
        }
        Ok(())
    }

    /// One record: `fields` in table mode, `record` serialized in JSON mode.
    pub fn record<T: Serialize, K: AsRef<str>>(
        &self,
        record: &T,
        fields: &[(K, String)],
    ) -> Result<(), AppError> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
            OutputFormat::Table => {
                for (key, value) in fields {
                    println!("{}", field_line(key.as_ref(), value));
                }
            }
        }
        Ok(())
    }

    /// A completion note, suppressed in JSON mode.
    pub fn done(&self, msg: &str) {
        if self.format == OutputFormat::Table {
            println!("ok: {msg}");
        }
    }
}

/// Report a failed command on stderr.
pub fn report_error(err: &AppError) {
    eprintln!("error: {err}");
}

fn field_line(key: &str, value: &str) -> String {
    format!("  {:<20} {value}", format!("{key}:"))
}
