//! Output formatting for CLI.

mod console;
mod csv;
mod json;
mod progress;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use pixelguard_core::ResultOutput;

pub use self::console::ConsoleOutput;
pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::progress::ProgressBar;
use crate::commands::OutputFormat;

/// Opens `path` for writing, or stdout when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn open_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Builds the reporter for `format`.
///
/// `details` only affects console output; `pretty` only affects JSON.
///
/// # Errors
///
/// Returns an error if the output file cannot be created.
pub fn create(
    format: OutputFormat,
    path: Option<&Path>,
    pretty: bool,
    details: bool,
) -> Result<Box<dyn ResultOutput>> {
    let writer = open_writer(path)?;
    Ok(match format {
        OutputFormat::Console => Box::new(ConsoleOutput::new(writer, details)),
        OutputFormat::Json => Box::new(JsonOutput::new(writer, pretty)),
        OutputFormat::Jsonl => Box::new(JsonOutput::lines(writer)),
        OutputFormat::Csv => Box::new(CsvOutput::new(writer)),
    })
}
