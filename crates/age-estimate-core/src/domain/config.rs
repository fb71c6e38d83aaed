//! Read-only service configuration snapshot.
//!
//! The snapshot is resolved once by an adapter before any request is
//! processed and then passed by reference into every pipeline stage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default upper bound on decoded image size (4096 x 4096).
pub const DEFAULT_MAX_PIXEL_COUNT: u64 = 4096 * 4096;

/// Default square input size of the estimator.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Operational constraints and model metadata for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Minimum number of pixels (width x height) an input image must have.
    pub min_pixel_count: u64,
    /// Optional minimum length of the shorter image edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_image_edge: Option<u32>,
    /// Largest image the loader will materialize.
    #[serde(default = "default_max_pixel_count")]
    pub max_pixel_count: u64,
    /// Confidence levels a request may ask for.
    pub allowed_confidence_levels: Vec<String>,
    /// Level used when a request omits `confidence_level`.
    pub default_confidence_level: String,
    /// Whether results include the face box when the request does not say.
    #[serde(default)]
    pub return_face_bbox_default: bool,
    /// Fairness caveats copied into every result.
    #[serde(default)]
    pub fairness_notes: Vec<String>,
    /// Known limitations copied into every result.
    #[serde(default)]
    pub limitations: Vec<String>,
    /// Model identity.
    pub model: ModelMetadata,
    /// Estimator calibration.
    pub calibration: Calibration,
    /// Reference detector settings.
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Model identity and published accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name.
    pub name: String,
    /// Model version.
    pub version: String,
    /// Mean absolute error measured at calibration time, in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_absolute_error: Option<f64>,
    /// Date the calibration was performed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_date: Option<String>,
}

/// Linear calibration from mean intensity to age, plus interval margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Years per unit of normalized intensity.
    pub slope: f64,
    /// Age at zero intensity.
    pub intercept: f64,
    /// Square side length the crop is resized to before prediction.
    #[serde(default = "default_input_size")]
    pub input_size: u32,
    /// Half-width of the reported interval, per confidence level.
    pub error_margins: BTreeMap<String, f64>,
}

/// Intensity band thresholds for the reference detector.
///
/// Bands, by mean intensity: below `no_face_below` is empty, then occluded,
/// then a single face from `occluded_below`, multiple faces from
/// `multiple_from`, and empty again from `washed_out_from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detector name reported in results.
    pub name: String,
    pub no_face_below: u8,
    pub occluded_below: u8,
    pub multiple_from: u8,
    pub washed_out_from: u8,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            name: String::from("intensity-bands"),
            no_face_below: 32,
            occluded_below: 64,
            multiple_from: 192,
            washed_out_from: 224,
        }
    }
}

const fn default_max_pixel_count() -> u64 {
    DEFAULT_MAX_PIXEL_COUNT
}

const fn default_input_size() -> u32 {
    DEFAULT_INPUT_SIZE
}

impl ServiceConfig {
    /// Whether `level` is one of the configured confidence levels.
    #[must_use]
    pub fn is_allowed_level(&self, level: &str) -> bool {
        self.allowed_confidence_levels.iter().any(|l| l == level)
    }

    /// Allowed levels that have no entry in the margin table.
    #[must_use]
    pub fn levels_without_margin(&self) -> Vec<&str> {
        self.allowed_confidence_levels
            .iter()
            .filter(|l| !self.calibration.error_margins.contains_key(l.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Validate configuration values are within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_pixel_count == 0 {
            return Err(String::from("min_pixel_count must be greater than 0"));
        }
        if self.max_pixel_count < self.min_pixel_count {
            return Err(format!(
                "max_pixel_count ({}) must be at least min_pixel_count ({})",
                self.max_pixel_count, self.min_pixel_count
            ));
        }
        if self.min_image_edge == Some(0) {
            return Err(String::from("min_image_edge must be greater than 0"));
        }

        if self.allowed_confidence_levels.is_empty() {
            return Err(String::from("allowed_confidence_levels must not be empty"));
        }
        if !self.is_allowed_level(&self.default_confidence_level) {
            return Err(format!(
                "default_confidence_level '{}' is not in allowed_confidence_levels",
                self.default_confidence_level
            ));
        }

        let cal = &self.calibration;
        if !cal.slope.is_finite() || !cal.intercept.is_finite() {
            return Err(String::from("calibration slope and intercept must be finite"));
        }
        if cal.input_size == 0 {
            return Err(String::from("calibration.input_size must be greater than 0"));
        }
        for (level, margin) in &cal.error_margins {
            if !margin.is_finite() || *margin < 0.0 {
                return Err(format!(
                    "calibration.error_margins.{level} must be a non-negative number, got {margin}"
                ));
            }
        }

        let det = &self.detector;
        if !(det.no_face_below < det.occluded_below
            && det.occluded_below < det.multiple_from
            && det.multiple_from < det.washed_out_from)
        {
            return Err(format!(
                "detector bands must be strictly increasing: no_face_below ({}) < occluded_below ({}) < multiple_from ({}) < washed_out_from ({})",
                det.no_face_below, det.occluded_below, det.multiple_from, det.washed_out_from
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
impl ServiceConfig {
    /// Config used by the crate's unit tests.
    pub(crate) fn sample() -> Self {
        Self {
            min_pixel_count: 16_384,
            min_image_edge: None,
            max_pixel_count: DEFAULT_MAX_PIXEL_COUNT,
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
                input_size: DEFAULT_INPUT_SIZE,
                error_margins: [("low", 12.0), ("medium", 8.0), ("high", 4.0)]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            },
            detector: DetectorConfig::default(),
        }
    }
}
