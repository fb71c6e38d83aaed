//! Request and config builders for testing.

use age_estimate_core::domain::{
    Calibration, DetectorConfig, FaceRegion, ModelMetadata, ServiceConfig,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};

/// Intensity the default detector reads as one clear face.
pub const SINGLE_FACE_INTENSITY: u8 = 128;

/// Base64 encodes a synthetic `width,height,intensity` image.
#[must_use]
pub fn encode_image(width: u32, height: u32, intensity: u8) -> String {
    STANDARD.encode(format!("{width},{height},{intensity}"))
}

/// Service config matching the embedded default document, minus caveat text.
///
/// Levels `low`, `medium` and `high` with margins 12, 8 and 4; minimum
/// resolution 128x128.
#[must_use]
pub fn sample_config() -> ServiceConfig {
    ServiceConfig {
        min_pixel_count: 16_384,
        min_image_edge: None,
        max_pixel_count: age_estimate_core::domain::DEFAULT_MAX_PIXEL_COUNT,
        allowed_confidence_levels: vec!["low".into(), "medium".into(), "high".into()],
        default_confidence_level: "medium".into(),
        return_face_bbox_default: false,
        fairness_notes: vec!["Accuracy varies across demographic groups.".into()],
        limitations: vec!["Not suitable for legal age verification.".into()],
        model: ModelMetadata {
            name: "calibrated-linear".into(),
            version: "1.0.0".into(),
            mean_absolute_error: Some(4.8),
            calibration_date: Some("2024-03-01".into()),
        },
        calibration: Calibration {
            slope: 60.0,
            intercept: 5.0,
            input_size: age_estimate_core::domain::DEFAULT_INPUT_SIZE,
            error_margins: [("low", 12.0), ("medium", 8.0), ("high", 4.0)]
                .into_iter()
                .map(|(level, margin)| (level.to_string(), margin))
                .collect(),
        },
        detector: DetectorConfig::default(),
    }
}

/// Builder for request payloads.
///
/// Starts from a consented request; every field can be overridden, replaced
/// with an arbitrary JSON value, or removed.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    fields: Map<String, Value>,
}

impl PayloadBuilder {
    /// Consented request for a uniform image.
    #[must_use]
    pub fn new(width: u32, height: u32, intensity: u8) -> Self {
        let mut fields = Map::new();
        fields.insert("image".into(), Value::String(encode_image(width, height, intensity)));
        fields.insert("consent".into(), Value::Bool(true));
        Self { fields }
    }

    /// Consented request the default detector sees as a single face.
    #[must_use]
    pub fn face(width: u32, height: u32) -> Self {
        Self::new(width, height, SINGLE_FACE_INTENSITY)
    }

    /// Sets the confidence level.
    #[must_use]
    pub fn level(self, level: &str) -> Self {
        self.field("confidence_level", Value::String(level.into()))
    }

    /// Sets the consent flag.
    #[must_use]
    pub fn consent(self, consent: bool) -> Self {
        self.field("consent", Value::Bool(consent))
    }

    /// Sets the face box flag.
    #[must_use]
    pub fn face_bbox(self, include: bool) -> Self {
        self.field("return_face_bbox", Value::Bool(include))
    }

    /// Sets the detector hints.
    #[must_use]
    pub fn hints(self, hints: &[FaceRegion]) -> Self {
        let hints = hints
            .iter()
            .map(|h| json!({"x": h.x, "y": h.y, "width": h.width, "height": h.height}))
            .collect();
        self.field("detector_hints", Value::Array(hints))
    }

    /// Replaces the image with a raw string.
    #[must_use]
    pub fn raw_image(self, image: &str) -> Self {
        self.field("image", Value::String(image.into()))
    }

    /// Sets any field to any JSON value.
    #[must_use]
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Removes a field.
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.fields.remove(name);
        self
    }

    /// Builds the JSON payload.
    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }

    /// Builds the payload as a JSON string.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_image() {
        assert_eq!(encode_image(1, 2, 3), "MSwyLDM=");
    }

    #[test]
    fn test_builder_defaults() {
        let payload = PayloadBuilder::face(128, 128).build();
        assert_eq!(payload["consent"], Value::Bool(true));
        assert_eq!(payload["image"], Value::String(encode_image(128, 128, 128)));
        assert!(payload.get("confidence_level").is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let payload = PayloadBuilder::face(128, 128)
            .consent(false)
            .level("high")
            .without("image")
            .build();
        assert_eq!(payload["consent"], Value::Bool(false));
        assert_eq!(payload["confidence_level"], "high");
        assert!(payload.get("image").is_none());
    }

    #[test]
    fn test_builder_hints() {
        let payload = PayloadBuilder::face(128, 128)
            .hints(&[FaceRegion::new(1, 2, 3, 4)])
            .build();
        assert_eq!(
            payload["detector_hints"],
            json!([{"x": 1, "y": 2, "width": 3, "height": 4}])
        );
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample_config().validate().is_ok());
    }
}
