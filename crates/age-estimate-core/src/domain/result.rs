//! Inference result types.

use serde::{Deserialize, Serialize};

use super::FaceRegion;

/// Point age estimate with a confidence interval.
///
/// Always satisfies `lower_bound <= point <= upper_bound` and `point >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeEstimate {
    /// Estimated age in years.
    pub point: f64,
    /// Lower bound of the interval, never negative.
    pub lower_bound: f64,
    /// Upper bound of the interval.
    pub upper_bound: f64,
    /// Confidence level echoed from the request.
    pub confidence_level: String,
}

impl AgeEstimate {
    /// Width of the reported interval.
    #[must_use]
    pub fn interval_width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }
}

/// Model identity block of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name.
    pub name: String,
    /// Model version.
    pub version: String,
    /// Published mean absolute error, in years.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_absolute_error: Option<f64>,
    /// Calibration date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_date: Option<String>,
}

/// Complete result for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// The age estimate.
    pub estimate: AgeEstimate,
    /// Model that produced the estimate.
    pub model: ModelInfo,
    /// Name of the face detector used.
    pub detector: String,
    /// Fairness caveats, in configured order.
    pub fairness_notes: Vec<String>,
    /// Known limitations, in configured order.
    pub limitations: Vec<String>,
    /// Detected face box, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_bbox: Option<FaceRegion>,
}
