//! CSV output adapter.

use anyhow::Result;
use pixelguard_core::{BatchReport, ImageAnalysis, ResultOutput};
use std::io::Write;
use std::sync::Mutex;

const HEADER: &str = "file_path,is_problematic";

/// Writes one `file_path,is_problematic` row per analysis.
pub struct CsvOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl CsvOutput {
    /// Creates a CSV output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_rows(&self, analyses: &[ImageAnalysis]) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{HEADER}")?;
        for analysis in analyses {
            writeln!(
                writer,
                "{},{}",
                escape(&analysis.path),
                analysis.is_problematic()
            )?;
        }
        Ok(())
    }
}

impl ResultOutput for CsvOutput {
    fn report_single(&self, analysis: &ImageAnalysis) -> Result<()> {
        self.write_rows(std::slice::from_ref(analysis))
    }

    fn report_batch(&self, report: &BatchReport) -> Result<()> {
        self.write_rows(&report.analyses)
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

/// Quotes a field containing a separator, quote or line break (RFC 4180).
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
