//! Face cropping.

use image::imageops;

use crate::domain::{CroppedImage, FaceRegion, NormalizedImage};
use crate::error::{PipelineError, PipelineResult};

/// Extracts `region` from `image`.
///
/// The bounds are checked here even though detectors promise in-bounds
/// regions; a custom detector may not keep that promise.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidRegion`] if the region is empty or extends
/// past the image.
pub fn crop(image: &NormalizedImage, region: FaceRegion) -> PipelineResult<CroppedImage> {
    let invalid = || PipelineError::InvalidRegion {
        region: region.to_string(),
        width: image.width(),
        height: image.height(),
    };

    if !region.fits_within(image.width(), image.height()) {
        return Err(invalid());
    }

    let view = imageops::crop_imm(
        image.as_gray(),
        region.x,
        region.y,
        region.width,
        region.height,
    );
    let cropped = NormalizedImage::from_gray(view.to_image()).ok_or_else(invalid)?;

    Ok(CroppedImage::new(cropped, region))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_crop_dimensions_and_pixels() {
        let image = NormalizedImage::uniform(100, 80, 77).unwrap();
        let cropped = crop(&image, FaceRegion::new(10, 8, 80, 64)).unwrap();
        assert_eq!(cropped.image().width(), 80);
        assert_eq!(cropped.image().height(), 64);
        assert_eq!(cropped.region(), FaceRegion::new(10, 8, 80, 64));
        assert!(cropped.image().pixels().iter().all(|&p| p == 77));
    }

    #[test]
    fn test_crop_takes_the_right_pixels() {
        let gray = GrayImage::from_fn(4, 4, |x, y| Luma([(y * 4 + x) as u8]));
        let image = NormalizedImage::from_gray(gray).unwrap();
        let cropped = crop(&image, FaceRegion::new(1, 2, 2, 2)).unwrap();
        assert_eq!(cropped.image().pixels(), &[9, 10, 13, 14]);
    }

    #[test]
    fn test_full_image_region() {
        let image = NormalizedImage::uniform(10, 10, 1).unwrap();
        assert!(crop(&image, FaceRegion::new(0, 0, 10, 10)).is_ok());
    }

    #[test]
    fn test_region_outside_bounds() {
        let image = NormalizedImage::uniform(10, 10, 1).unwrap();
        let err = crop(&image, FaceRegion::new(5, 5, 6, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_empty_region() {
        let image = NormalizedImage::uniform(10, 10, 1).unwrap();
        let err = crop(&image, FaceRegion::new(0, 0, 0, 4)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);
    }

    #[test]
    fn test_overflowing_region() {
        let image = NormalizedImage::uniform(10, 10, 1).unwrap();
        let err = crop(&image, FaceRegion::new(u32::MAX, 0, 2, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRegion);
    }
}
