//! Validated inference request.

use super::FaceRegion;

/// A request that passed payload validation.
///
/// Consent has been checked and the confidence level is a member of the
/// configured set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// Base64 encoded image payload.
    pub image: String,
    /// Requested confidence level.
    pub confidence_level: String,
    /// Whether to include the face box in the result.
    pub return_face_bbox: bool,
    /// Caller-supplied face boxes, in request order.
    pub detector_hints: Vec<FaceRegion>,
}
