//! Age model port.

use crate::domain::NormalizedImage;

/// Maps a model-ready face crop to a raw point age estimate.
///
/// Interval construction is handled by the estimator stage, so a model only
/// has to produce the point.
pub trait AgeModel: Send + Sync {
    /// Square side length the model expects its input resized to.
    fn input_size(&self) -> u32;

    /// Predicts an age in years.
    fn predict(&self, face: &NormalizedImage) -> f64;
}
