//! End-to-end inference orchestration.
//!
//! Stages run in a fixed order: validation, image loading, face detection,
//! cropping, estimation, assembly. The first failure aborts the request and
//! no partial result is ever produced.

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::domain::{DetectionOutcome, InferenceResult, ServiceConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::ports::{AgeModel, FaceDetector};
use crate::stages::{
    assemble, crop, estimate_with, load, validate, CalibratedLinearModel, IntensityBandDetector,
};

/// Runs requests against a fixed config snapshot.
///
/// The detector and model are pluggable; by default the pipeline uses the
/// reference [`IntensityBandDetector`] and a [`CalibratedLinearModel`] built
/// from the snapshot's calibration.
pub struct AgeEstimationPipeline {
    config: ServiceConfig,
    detector: Box<dyn FaceDetector>,
    model: Box<dyn AgeModel>,
}

impl AgeEstimationPipeline {
    /// Creates a pipeline with the reference detector and calibrated model.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let detector = Box::new(IntensityBandDetector::new(config.detector.clone()));
        let model = Box::new(CalibratedLinearModel::from(&config.calibration));
        Self {
            config,
            detector,
            model,
        }
    }

    /// Replaces the face detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replaces the age model.
    #[must_use]
    pub fn with_model(mut self, model: Box<dyn AgeModel>) -> Self {
        self.model = model;
        self
    }

    /// The config snapshot every request is evaluated against.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Processes a single request payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] raised by any stage.
    #[instrument(skip_all, fields(detector = self.detector.name()))]
    pub fn run(&self, payload: &Value) -> PipelineResult<InferenceResult> {
        let outcome = self.process(payload);
        match &outcome {
            Ok(result) => info!(
                point = result.estimate.point,
                level = %result.estimate.confidence_level,
                "Request completed"
            ),
            Err(err) if err.is_recoverable() => {
                info!(kind = %err.kind(), "Request rejected: {err}");
            }
            Err(err) => warn!(kind = %err.kind(), "Request failed: {err}"),
        }
        outcome
    }

    fn process(&self, payload: &Value) -> PipelineResult<InferenceResult> {
        let config = &self.config;
        let request = validate(payload, config)?;
        let image = load(&request.image, config)?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image loaded"
        );

        let region = match self.detector.detect(&image, &request.detector_hints) {
            DetectionOutcome::SingleFace(region) => region,
            DetectionOutcome::NoFace => return Err(PipelineError::NoFaceDetected),
            DetectionOutcome::MultipleFaces(count) => {
                return Err(PipelineError::MultipleFacesDetected { count })
            }
            DetectionOutcome::OccludedFace => return Err(PipelineError::OccludedFace),
        };

        let cropped = crop(&image, region)?;
        let estimate = estimate_with(
            self.model.as_ref(),
            &cropped,
            &request.confidence_level,
            &config.calibration.error_margins,
        )?;

        let face_bbox = request.return_face_bbox.then_some(region);
        Ok(assemble(estimate, config, self.detector.name(), face_bbox))
    }
}

/// Runs one request through the default pipeline.
///
/// # Errors
///
/// Returns the first [`PipelineError`] raised by any stage.
pub fn run_inference(payload: &Value, config: &ServiceConfig) -> PipelineResult<InferenceResult> {
    AgeEstimationPipeline::new(config.clone()).run(payload)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::json;

    use super::*;
    use crate::domain::{FaceRegion, NormalizedImage};
    use crate::error::ErrorKind;

    fn encode(width: u32, height: u32, intensity: u8) -> String {
        STANDARD.encode(format!("{width},{height},{intensity}"))
    }

    fn payload(intensity: u8, level: &str) -> Value {
        json!({
            "image": encode(128, 128, intensity),
            "consent": true,
            "confidence_level": level,
        })
    }

    fn run(payload: &Value) -> PipelineResult<InferenceResult> {
        run_inference(payload, &ServiceConfig::sample())
    }

    struct CountingDetector {
        outcome: DetectionOutcome,
        calls: Arc<AtomicUsize>,
    }

    impl FaceDetector for CountingDetector {
        fn name(&self) -> &str {
            "counting"
        }

        fn detect(&self, _image: &NormalizedImage, _hints: &[FaceRegion]) -> DetectionOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    #[test]
    fn test_valid_request() {
        let result = run(&payload(128, "high")).unwrap();
        let est = &result.estimate;
        assert!(est.point >= 0.0);
        assert!(est.lower_bound <= est.point && est.point <= est.upper_bound);
        assert_eq!(est.confidence_level, "high");
        assert_eq!(result.model.name, "calibrated-linear");
        assert_eq!(result.detector, "intensity-bands");
        assert_eq!(
            result.fairness_notes,
            vec!["Accuracy varies across demographic groups."]
        );
        assert!(result.face_bbox.is_none());
    }

    #[test]
    fn test_consent_checked_before_image() {
        let err = run(&json!({"image": "!!!", "consent": false})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consent);
    }

    #[test]
    fn test_low_resolution() {
        let payload = json!({"image": encode(50, 50, 128), "consent": true});
        assert_eq!(run(&payload).unwrap_err().kind(), ErrorKind::LowResolution);
    }

    #[test]
    fn test_no_face_bands() {
        for intensity in [10, 240] {
            let err = run(&payload(intensity, "medium")).unwrap_err();
            assert_eq!(err, PipelineError::NoFaceDetected);
        }
    }

    #[test]
    fn test_multiple_faces() {
        let err = run(&payload(200, "medium")).unwrap_err();
        assert_eq!(err, PipelineError::MultipleFacesDetected { count: 2 });
    }

    #[test]
    fn test_occluded_face() {
        let err = run(&payload(40, "medium")).unwrap_err();
        assert_eq!(err, PipelineError::OccludedFace);
    }

    #[test]
    fn test_default_level_applied() {
        let payload = json!({"image": encode(128, 128, 128), "consent": true});
        let result = run(&payload).unwrap();
        assert_eq!(result.estimate.confidence_level, "medium");
    }

    #[test]
    fn test_deterministic() {
        let first = run(&payload(150, "low")).unwrap();
        let second = run(&payload(150, "low")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_face_bbox_on_request() {
        let mut payload = payload(128, "medium");
        payload["return_face_bbox"] = json!(true);
        let result = run(&payload).unwrap();
        assert_eq!(result.face_bbox, Some(FaceRegion::new(12, 12, 102, 102)));
    }

    #[test]
    fn test_face_bbox_config_default() {
        let mut config = ServiceConfig::sample();
        config.return_face_bbox_default = true;
        let result = run_inference(&payload(128, "medium"), &config).unwrap();
        assert!(result.face_bbox.is_some());
    }

    #[test]
    fn test_detector_not_called_after_validation_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AgeEstimationPipeline::new(ServiceConfig::sample()).with_detector(
            Box::new(CountingDetector {
                outcome: DetectionOutcome::NoFace,
                calls: Arc::clone(&calls),
            }),
        );

        let err = pipeline.run(&json!({"consent": true})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_out_of_bounds_region_from_custom_detector() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = AgeEstimationPipeline::new(ServiceConfig::sample()).with_detector(
            Box::new(CountingDetector {
                outcome: DetectionOutcome::SingleFace(FaceRegion::new(100, 100, 64, 64)),
                calls: Arc::clone(&calls),
            }),
        );

        let err = pipeline.run(&payload(128, "medium")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);
        assert!(!err.is_recoverable());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_detector_name_reported() {
        let pipeline = AgeEstimationPipeline::new(ServiceConfig::sample()).with_detector(
            Box::new(CountingDetector {
                outcome: DetectionOutcome::SingleFace(FaceRegion::new(0, 0, 128, 128)),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );
        let result = pipeline.run(&payload(10, "low")).unwrap();
        assert_eq!(result.detector, "counting");
    }

    #[test]
    fn test_missing_margin_is_not_recoverable() {
        let mut config = ServiceConfig::sample();
        config.calibration.error_margins.remove("high");
        let err = run_inference(&payload(128, "high"), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Estimation);
        assert_eq!(err.public_message(), "internal error while estimating age");
    }

    #[test]
    fn test_single_hint_becomes_face_bbox() {
        let mut payload = payload(128, "medium");
        payload["return_face_bbox"] = json!(true);
        payload["detector_hints"] = json!([{"x": 8, "y": 16, "width": 64, "height": 48}]);
        let result = run(&payload).unwrap();
        assert_eq!(result.face_bbox, Some(FaceRegion::new(8, 16, 64, 48)));
    }

    #[test]
    fn test_two_hints_are_multiple_faces() {
        let mut payload = payload(128, "medium");
        payload["detector_hints"] = json!([
            {"x": 0, "y": 0, "width": 32, "height": 32},
            {"x": 64, "y": 64, "width": 32, "height": 32},
        ]);
        let err = run(&payload).unwrap_err();
        assert_eq!(err, PipelineError::MultipleFacesDetected { count: 2 });
    }

    #[test]
    fn test_out_of_bounds_hint_is_invalid_region() {
        let mut payload = payload(128, "medium");
        payload["detector_hints"] = json!([{"x": 100, "y": 100, "width": 64, "height": 64}]);
        let err = run(&payload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);
    }
}
