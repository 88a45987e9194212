//! JSON and JSON Lines output adapter.

use anyhow::Result;
use pixelguard_core::{BatchReport, ImageAnalysis, ResultOutput};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;

use crate::commands::iso_timestamp;

/// JSON output adapter.
///
/// In document mode a batch is written as one object with `generated_at`,
/// `summary` and `analyses`. In lines mode every analysis is its own line.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pretty: bool,
    lines: bool,
}

impl JsonOutput {
    /// Creates a JSON document output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
            lines: false,
        }
    }

    /// Creates a JSON Lines output writing to the given writer.
    #[must_use]
    pub fn lines(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty: false,
            lines: true,
        }
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        })
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn report_single(&self, analysis: &ImageAnalysis) -> Result<()> {
        let json = self.encode(analysis)?;
        self.write_line(&json)
    }

    fn report_batch(&self, report: &BatchReport) -> Result<()> {
        if self.lines {
            for analysis in &report.analyses {
                self.write_line(&serde_json::to_string(analysis)?)?;
            }
            return Ok(());
        }
        let document = json!({
            "generated_at": iso_timestamp(),
            "summary": report.summary,
            "analyses": report.analyses,
        });
        let json = self.encode(&document)?;
        self.write_line(&json)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
