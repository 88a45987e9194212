//! Human-readable console output.

use anyhow::Result;
use pixelguard_core::{BatchReport, DetectionResult, ImageAnalysis, ResultOutput};
use serde_json::Value;
use std::io::Write;
use std::sync::Mutex;

/// Plain-text reporter.
///
/// With `details` set, every detector's verdict, confidence and details are
/// listed under each image.
pub struct ConsoleOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    details: bool,
}

impl ConsoleOutput {
    /// Creates a console output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, details: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            details,
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn emit(&self, text: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

impl ResultOutput for ConsoleOutput {
    fn report_single(&self, analysis: &ImageAnalysis) -> Result<()> {
        let mut text = format!("File: {}\n", analysis.path);
        text.push_str(&format!("Status: {}\n", status(analysis.is_problematic())));

        if analysis.is_problematic() {
            text.push_str("\nIssues Found:\n");
            for result in analysis.results().iter().filter(|r| r.is_problematic) {
                for issue in &result.issues {
                    text.push_str(&format!("  - {issue}\n"));
                }
            }
        }

        if self.details {
            text.push_str(&detection_details(analysis.results()));
        }
        self.emit(&text)
    }

    fn report_batch(&self, report: &BatchReport) -> Result<()> {
        let mut text = String::new();
        for analysis in &report.analyses {
            match analysis.failure_summary() {
                Some(reason) => {
                    text.push_str(&format!("{}: PROBLEMATIC ({reason})\n", analysis.path));
                }
                None => text.push_str(&format!("{}: OK\n", analysis.path)),
            }
            if self.details {
                text.push_str(&detection_details(analysis.results()));
            }
        }
        text.push_str(&format!(
            "\nBatch Report: {} problematic out of {} images ({} passed).\n",
            report.summary.problematic, report.summary.total, report.summary.passed
        ));
        self.emit(&text)
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

const fn status(problematic: bool) -> &'static str {
    if problematic {
        "PROBLEMATIC"
    } else {
        "OK"
    }
}

fn detection_details(results: &[DetectionResult]) -> String {
    if results.is_empty() {
        return String::new();
    }
    let mut text = String::from("\nDetection Details:\n");
    for result in results {
        let verdict = if result.is_problematic { "FAILED" } else { "PASSED" };
        text.push_str(&format!(
            "  {}: {verdict} (confidence: {:.2})\n",
            result.detector_name,
            result.confidence()
        ));
        for (key, value) in &result.details {
            match value {
                Value::Object(nested) => {
                    text.push_str(&format!("    {key}:\n"));
                    for (sub_key, sub_value) in nested {
                        text.push_str(&format!("      {sub_key}: {sub_value}\n"));
                    }
                }
                other => text.push_str(&format!("    {key}: {other}\n")),
            }
        }
    }
    text
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pixelguard_core::Details;
    use std::sync::{Arc, PoisonError};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn flagged() -> ImageAnalysis {
        let mut details = Details::new();
        details.insert("width".into(), Value::from(50));
        let mut analysis = ImageAnalysis::new("small.png", 50, 50);
        analysis.add_result(DetectionResult::new(
            "ratio",
            true,
            0.4,
            details,
            vec!["Width 50 is below minimum 100".into()],
        ));
        analysis
    }

    #[test]
    fn test_single_with_details() {
        let buffer = Buffer::default();
        let output = ConsoleOutput::new(Box::new(buffer.clone()), true);
        output.report_single(&flagged()).unwrap();

        let text = buffer.text();
        assert!(text.contains("File: small.png"));
        assert!(text.contains("Status: PROBLEMATIC"));
        assert!(text.contains("  - Width 50 is below minimum 100"));
        assert!(text.contains("ratio: FAILED (confidence: 0.40)"));
        assert!(text.contains("    width: 50"));
    }

    #[test]
    fn test_batch_summary_line() {
        let buffer = Buffer::default();
        let output = ConsoleOutput::new(Box::new(buffer.clone()), false);
        let report = BatchReport::new(vec![flagged(), ImageAnalysis::new("fine.png", 10, 10)]);
        output.report_batch(&report).unwrap();

        let text = buffer.text();
        assert!(text.contains("small.png: PROBLEMATIC (ratio: Width 50 is below minimum 100)"));
        assert!(text.contains("fine.png: OK"));
        assert!(text.contains("Batch Report: 1 problematic out of 2 images (1 passed)."));
        assert!(!text.contains("Detection Details"));
    }
}
