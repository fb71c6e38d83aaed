//! Response assembly.

use crate::domain::{AgeEstimate, FaceRegion, InferenceResult, ModelInfo, ServiceConfig};

/// Combines an estimate with the configured model metadata and caveats.
///
/// Fairness notes and limitations are copied verbatim and in order.
#[must_use]
pub fn assemble(
    estimate: AgeEstimate,
    config: &ServiceConfig,
    detector: &str,
    face_bbox: Option<FaceRegion>,
) -> InferenceResult {
    let model = &config.model;
    InferenceResult {
        estimate,
        model: ModelInfo {
            name: model.name.clone(),
            version: model.version.clone(),
            mean_absolute_error: model.mean_absolute_error,
            calibration_date: model.calibration_date.clone(),
        },
        detector: detector.to_string(),
        fairness_notes: config.fairness_notes.clone(),
        limitations: config.limitations.clone(),
        face_bbox,
    }
}
