//! Grayscale image types flowing through the pipeline.

use image::{GrayImage, Luma};

use super::FaceRegion;

/// A decoded, normalized single-channel image.
///
/// Width and height are always positive and the pixel buffer is row-major
/// with exactly `width * height` intensity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    buffer: GrayImage,
}

impl NormalizedImage {
    /// Creates an image where every pixel has the same intensity.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn uniform(width: u32, height: u32, intensity: u8) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            buffer: GrayImage::from_pixel(width, height, Luma([intensity])),
        })
    }

    /// Wraps an existing grayscale buffer.
    ///
    /// Returns `None` if either dimension is zero.
    #[must_use]
    pub fn from_gray(buffer: GrayImage) -> Option<Self> {
        if buffer.width() == 0 || buffer.height() == 0 {
            return None;
        }
        Some(Self { buffer })
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Total number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Row-major intensity values.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Borrow the underlying buffer.
    #[must_use]
    pub const fn as_gray(&self) -> &GrayImage {
        &self.buffer
    }

    /// Mean intensity in `[0, 255]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_intensity(&self) -> f64 {
        let sum: u64 = self.pixels().iter().map(|&p| u64::from(p)).sum();
        sum as f64 / self.pixel_count() as f64
    }
}

/// A normalized image restricted to a detected face region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CroppedImage {
    image: NormalizedImage,
    region: FaceRegion,
}

impl CroppedImage {
    pub(crate) const fn new(image: NormalizedImage, region: FaceRegion) -> Self {
        Self { image, region }
    }

    /// The cropped pixels.
    #[must_use]
    pub const fn image(&self) -> &NormalizedImage {
        &self.image
    }

    /// The region of the source image this crop came from.
    #[must_use]
    pub const fn region(&self) -> FaceRegion {
        self.region
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_rejects_zero_dimensions() {
        assert!(NormalizedImage::uniform(0, 10, 128).is_none());
        assert!(NormalizedImage::uniform(10, 0, 128).is_none());
    }

    #[test]
    fn test_uniform_fills_every_pixel() {
        let img = NormalizedImage::uniform(7, 3, 42).unwrap();
        assert_eq!(img.pixels().len(), 21);
        assert!(img.pixels().iter().all(|&p| p == 42));
        assert_eq!(img.pixel_count(), 21);
    }

    #[test]
    fn test_mean_intensity() {
        let gray = GrayImage::from_fn(2, 2, |x, y| Luma([if x == y { 0 } else { 200 }]));
        let img = NormalizedImage::from_gray(gray).unwrap();
        assert!((img.mean_intensity() - 100.0).abs() < f64::EPSILON);
    }
}
