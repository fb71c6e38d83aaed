//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use age_estimate_core::{ErrorReport, InferenceResult, ResultOutput};
use anyhow::Result;
use serde::Serialize;

/// Error envelope written in place of a result.
#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a ErrorReport,
}

/// JSON output adapter, one document per line unless pretty-printed.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty,
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_document<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, result: &InferenceResult) -> Result<()> {
        self.write_document(result)
    }

    fn write_error(&self, report: &ErrorReport) -> Result<()> {
        self.write_document(&ErrorEnvelope { error: report })
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
