//! Result output port for writing inference outcomes.

use crate::domain::InferenceResult;
use crate::error::ErrorReport;

/// Port for outputting inference results.
pub trait ResultOutput: Send + Sync {
    /// Writes a successful result.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, result: &InferenceResult) -> anyhow::Result<()>;

    /// Writes a rejected or failed request.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_error(&self, report: &ErrorReport) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
