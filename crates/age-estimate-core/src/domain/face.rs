//! Face detection types.

use serde::{Deserialize, Serialize};

/// Axis-aligned face bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    /// X coordinate of the top-left corner.
    pub x: u32,
    /// Y coordinate of the top-left corner.
    pub y: u32,
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl FaceRegion {
    /// Creates a new region.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the box is non-empty and lies entirely inside a
    /// `width` x `height` image.
    #[must_use]
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        self.width > 0
            && self.height > 0
            && right <= u64::from(width)
            && bottom <= u64::from(height)
    }
}

impl std::fmt::Display for FaceRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(x={}, y={}, w={}, h={})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Result of running a face detector over one image.
///
/// Exactly one variant holds per detection call; only `SingleFace` lets the
/// pipeline continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// No face present.
    NoFace,
    /// Exactly one unobstructed face.
    SingleFace(FaceRegion),
    /// More than one face; carries the count.
    MultipleFaces(usize),
    /// A face is present but obstructed.
    OccludedFace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits_within() {
        assert!(FaceRegion::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(FaceRegion::new(5, 5, 5, 5).fits_within(10, 10));
        assert!(!FaceRegion::new(5, 5, 6, 5).fits_within(10, 10));
        assert!(!FaceRegion::new(0, 0, 0, 5).fits_within(10, 10));
    }

    #[test]
    fn test_fits_within_does_not_overflow() {
        let region = FaceRegion::new(u32::MAX, 0, u32::MAX, 1);
        assert!(!region.fits_within(u32::MAX, u32::MAX));
    }
}
