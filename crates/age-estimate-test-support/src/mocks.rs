//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use age_estimate_core::domain::{DetectionOutcome, FaceRegion, InferenceResult, NormalizedImage};
use age_estimate_core::error::ErrorReport;
use age_estimate_core::ports::{AgeModel, FaceDetector, ResultOutput};

/// Mock implementation of `FaceDetector` for testing.
///
/// Returns a fixed outcome, ignoring hints, and counts calls for assertions.
pub struct MockFaceDetector {
    outcome: DetectionOutcome,
    calls: Arc<Mutex<usize>>,
}

impl MockFaceDetector {
    /// Creates a detector that always returns `outcome`.
    #[must_use]
    pub fn new(outcome: DetectionOutcome) -> Self {
        Self {
            outcome,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Handle for reading the call count after the detector is boxed.
    #[must_use]
    pub fn call_counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.calls)
    }

    /// Returns the number of times `detect` was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FaceDetector for MockFaceDetector {
    fn name(&self) -> &str {
        "mock"
    }

    fn detect(&self, _image: &NormalizedImage, _hints: &[FaceRegion]) -> DetectionOutcome {
        if let Ok(mut c) = self.calls.lock() {
            *c += 1;
        }
        self.outcome
    }
}

/// Mock implementation of `AgeModel` for testing.
///
/// Predicts a fixed age and records the input dimensions it was given.
pub struct MockAgeModel {
    age: f64,
    input_size: u32,
    inputs: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl MockAgeModel {
    /// Creates a model that always predicts `age`.
    #[must_use]
    pub fn new(age: f64) -> Self {
        Self::with_input_size(age, 32)
    }

    /// Creates a model with a specific input size.
    #[must_use]
    pub fn with_input_size(age: f64, input_size: u32) -> Self {
        Self {
            age,
            input_size,
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle for reading recorded inputs after the model is boxed.
    #[must_use]
    pub fn input_log(&self) -> Arc<Mutex<Vec<(u32, u32)>>> {
        Arc::clone(&self.inputs)
    }
}

impl AgeModel for MockAgeModel {
    fn input_size(&self) -> u32 {
        self.input_size
    }

    fn predict(&self, face: &NormalizedImage) -> f64 {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((face.width(), face.height()));
        self.age
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures results and error reports for later assertions.
pub struct MockResultOutput {
    results: Arc<Mutex<Vec<InferenceResult>>>,
    errors: Arc<Mutex<Vec<ErrorReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
            errors: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured results.
    #[must_use]
    pub fn results(&self) -> Vec<InferenceResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns all captured error reports.
    #[must_use]
    pub fn errors(&self) -> Vec<ErrorReport> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, result: &InferenceResult) -> anyhow::Result<()> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result.clone());
        Ok(())
    }

    fn write_error(&self, report: &ErrorReport) -> anyhow::Result<()> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}
