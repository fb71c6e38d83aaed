//! Calibrated age estimation.
//!
//! The crop is resized to the model's input size, the model produces a
//! point estimate, and the interval half-width comes from the configured
//! per-level margin table.

use std::collections::BTreeMap;

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::domain::{AgeEstimate, Calibration, CroppedImage, NormalizedImage};
use crate::error::{PipelineError, PipelineResult};
use crate::ports::AgeModel;

/// Linear mapping from normalized mean intensity to age.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedLinearModel {
    slope: f64,
    intercept: f64,
    input_size: u32,
}

impl CalibratedLinearModel {
    /// Creates a model from explicit parameters.
    #[must_use]
    pub const fn new(slope: f64, intercept: f64, input_size: u32) -> Self {
        Self {
            slope,
            intercept,
            input_size,
        }
    }
}

impl From<&Calibration> for CalibratedLinearModel {
    fn from(calibration: &Calibration) -> Self {
        Self::new(
            calibration.slope,
            calibration.intercept,
            calibration.input_size,
        )
    }
}

impl AgeModel for CalibratedLinearModel {
    fn input_size(&self) -> u32 {
        self.input_size
    }

    fn predict(&self, face: &NormalizedImage) -> f64 {
        self.slope.mul_add(face.mean_intensity() / 255.0, self.intercept)
    }
}

/// Estimates age using the linear model described by `calibration`.
///
/// # Errors
///
/// Returns [`PipelineError::Estimation`] if the margin table has no usable
/// entry for `level` or the model output is not finite.
pub fn estimate(
    cropped: &CroppedImage,
    level: &str,
    calibration: &Calibration,
) -> PipelineResult<AgeEstimate> {
    let model = CalibratedLinearModel::from(calibration);
    estimate_with(&model, cropped, level, &calibration.error_margins)
}

/// Estimates age with an arbitrary model and margin table.
///
/// # Errors
///
/// Returns [`PipelineError::Estimation`] if the margin table has no usable
/// entry for `level` or the model output is not finite.
pub fn estimate_with(
    model: &dyn AgeModel,
    cropped: &CroppedImage,
    level: &str,
    margins: &BTreeMap<String, f64>,
) -> PipelineResult<AgeEstimate> {
    // Look the margin up first so a config fault fails before any model work.
    let margin = *margins.get(level).ok_or_else(|| {
        PipelineError::estimation(format!("no error margin configured for level '{level}'"))
    })?;
    if !margin.is_finite() || margin < 0.0 {
        return Err(PipelineError::estimation(format!(
            "error margin for level '{level}' is invalid: {margin}"
        )));
    }

    let input = prepare_input(cropped.image(), model.input_size())?;
    let raw = model.predict(&input);
    if !raw.is_finite() {
        return Err(PipelineError::estimation(format!(
            "model produced a non-finite estimate: {raw}"
        )));
    }

    let point = raw.max(0.0);
    let estimate = AgeEstimate {
        point,
        lower_bound: (point - margin).max(0.0),
        upper_bound: point + margin,
        confidence_level: level.to_string(),
    };

    debug!(
        point = estimate.point,
        lower = estimate.lower_bound,
        upper = estimate.upper_bound,
        level,
        "Age estimated"
    );

    Ok(estimate)
}

/// Resizes the crop to the model's square input.
fn prepare_input(face: &NormalizedImage, size: u32) -> PipelineResult<NormalizedImage> {
    if size == 0 {
        return Err(PipelineError::estimation("model input size must be positive"));
    }
    if face.width() == size && face.height() == size {
        return Ok(face.clone());
    }
    let resized = imageops::resize(face.as_gray(), size, size, FilterType::Triangle);
    NormalizedImage::from_gray(resized)
        .ok_or_else(|| PipelineError::estimation("resized model input is empty"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{FaceRegion, ServiceConfig};
    use crate::error::ErrorKind;
    use crate::stages::crop;

    fn cropped(intensity: u8) -> CroppedImage {
        let image = NormalizedImage::uniform(128, 128, intensity).unwrap();
        crop(&image, FaceRegion::new(12, 12, 102, 102)).unwrap()
    }

    fn calibration() -> Calibration {
        ServiceConfig::sample().calibration
    }

    #[test]
    fn test_point_follows_calibration() {
        let est = estimate(&cropped(255), "medium", &calibration()).unwrap();
        // 60 * 1.0 + 5
        assert!((est.point - 65.0).abs() < 1e-9);
        assert!((est.lower_bound - 57.0).abs() < 1e-9);
        assert!((est.upper_bound - 73.0).abs() < 1e-9);
        assert_eq!(est.confidence_level, "medium");
    }

    #[test]
    fn test_bounds_order() {
        for intensity in [64, 100, 128, 191] {
            for level in ["low", "medium", "high"] {
                let est = estimate(&cropped(intensity), level, &calibration()).unwrap();
                assert!(est.lower_bound <= est.point);
                assert!(est.point <= est.upper_bound);
                assert!(est.lower_bound >= 0.0);
            }
        }
    }

    #[test]
    fn test_high_level_is_narrowest() {
        let face = cropped(128);
        let widths: Vec<f64> = ["low", "medium", "high"]
            .iter()
            .map(|level| estimate(&face, level, &calibration()).unwrap().interval_width())
            .collect();
        assert!(widths[2] < widths[1]);
        assert!(widths[1] < widths[0]);
    }

    #[test]
    fn test_lower_bound_clamped_at_zero() {
        let mut cal = calibration();
        cal.intercept = 1.0;
        cal.slope = 0.0;
        let est = estimate(&cropped(128), "low", &cal).unwrap();
        assert!((est.point - 1.0).abs() < 1e-9);
        assert!(est.lower_bound.abs() < f64::EPSILON);
        assert!((est.upper_bound - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_prediction_clamped() {
        let mut cal = calibration();
        cal.intercept = -50.0;
        let est = estimate(&cropped(64), "high", &cal).unwrap();
        assert!(est.point.abs() < f64::EPSILON);
        assert!(est.lower_bound <= est.point);
    }

    #[test]
    fn test_missing_margin_is_internal_fault() {
        let err = estimate(&cropped(128), "ultra", &calibration()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Estimation);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_non_finite_prediction() {
        let mut cal = calibration();
        cal.slope = f64::INFINITY;
        let err = estimate(&cropped(128), "high", &cal).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Estimation);
    }

    #[test]
    fn test_input_resized_to_model_size() {
        let face = cropped(90);
        let input = prepare_input(face.image(), 224).unwrap();
        assert_eq!((input.width(), input.height()), (224, 224));
        assert!(input.pixels().iter().all(|&p| p == 90));
    }
}
