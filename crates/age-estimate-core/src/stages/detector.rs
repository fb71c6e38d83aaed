//! Reference face detector.
//!
//! Classifies the mean image intensity into fixed bands instead of running a
//! vision model. Deterministic by construction, so it stands in for a real
//! detector behind the [`FaceDetector`] port. Caller hints, when present,
//! take precedence over the bands: each hint counts as one detected face.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use tracing::debug;

use crate::domain::{DetectionOutcome, DetectorConfig, FaceRegion, NormalizedImage};
use crate::ports::FaceDetector;

/// Intensity levels per additional face in the multiple-faces band.
const LEVELS_PER_EXTRA_FACE: u8 = 16;

/// Detector that maps intensity bands to detection outcomes.
#[derive(Debug, Clone)]
pub struct IntensityBandDetector {
    config: DetectorConfig,
}

impl IntensityBandDetector {
    /// Creates a detector with the given band thresholds.
    #[must_use]
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Classifies a single intensity level.
    fn classify(&self, level: u8, width: u32, height: u32) -> DetectionOutcome {
        let bands = &self.config;
        if level < bands.no_face_below || level >= bands.washed_out_from {
            DetectionOutcome::NoFace
        } else if level < bands.occluded_below {
            DetectionOutcome::OccludedFace
        } else if level < bands.multiple_from {
            DetectionOutcome::SingleFace(centered_region(width, height))
        } else {
            let extra = (level - bands.multiple_from) / LEVELS_PER_EXTRA_FACE;
            DetectionOutcome::MultipleFaces(2 + usize::from(extra))
        }
    }
}

impl Default for IntensityBandDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl FaceDetector for IntensityBandDetector {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn detect(&self, image: &NormalizedImage, hints: &[FaceRegion]) -> DetectionOutcome {
        match hints {
            [] => {}
            [hint] => {
                debug!(%hint, "Using detector hint");
                return DetectionOutcome::SingleFace(*hint);
            }
            _ => {
                debug!(count = hints.len(), "Multiple detector hints");
                return DetectionOutcome::MultipleFaces(hints.len());
            }
        }

        let level = image.mean_intensity().round().clamp(0.0, 255.0) as u8;
        let outcome = self.classify(level, image.width(), image.height());
        debug!(level, ?outcome, "Intensity band classified");
        outcome
    }
}

/// Centered box inset by 10% on every side, at least one pixel wide.
fn centered_region(width: u32, height: u32) -> FaceRegion {
    let inset = |len: u32| {
        let offset = len / 10;
        let size = ((u64::from(len) * 8) / 10).max(1) as u32;
        (offset, size)
    };
    let (x, w) = inset(width);
    let (y, h) = inset(height);
    FaceRegion::new(x, y, w, h)
}
