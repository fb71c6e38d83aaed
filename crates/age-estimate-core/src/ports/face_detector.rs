//! Face detection port.

use crate::domain::{DetectionOutcome, FaceRegion, NormalizedImage};

/// Pluggable face detection backend.
///
/// Implementations must be deterministic: the same image and hints always
/// yield the same outcome. A region the detector derives itself must lie
/// within the image bounds; regions taken from caller hints are passed on
/// unchecked and the cropper rejects any that do not fit.
pub trait FaceDetector: Send + Sync {
    /// Returns the name reported in results.
    fn name(&self) -> &str;

    /// Classifies the faces present in `image`.
    ///
    /// `hints` are caller-supplied face boxes; an empty slice means the
    /// caller has no prior knowledge.
    fn detect(&self, image: &NormalizedImage, hints: &[FaceRegion]) -> DetectionOutcome;
}
