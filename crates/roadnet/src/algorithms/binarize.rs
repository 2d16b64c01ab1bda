use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use crate::{error::{Result, RoadnetError}, traits::ImagePreprocessor};

/// Value of a set pixel in every mask produced by this crate
pub const FOREGROUND: u8 = 255;
/// Value of an unset pixel
pub const BACKGROUND: u8 = 0;

/// Convert a decoded image to single-channel intensity.
pub fn to_grayscale(image: &DynamicImage) -> Result<GrayImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(RoadnetError::InvalidInput(format!(
            "image is empty ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(image.to_luma8())
}

/// Global Otsu binarization: pixels strictly above the level become
/// [`FOREGROUND`]. With `invert` set the dark side is kept instead.
pub fn otsu_binarize(gray: &GrayImage, invert: bool) -> GrayImage {
    let level = otsu_level(gray);
    tracing::trace!(level, invert, "otsu threshold");
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let above = gray.get_pixel(x, y)[0] > level;
        if above != invert {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Light side of the Otsu split; the surface the width probe runs against.
pub fn foreground_mask(gray: &GrayImage) -> GrayImage {
    otsu_binarize(gray, false)
}

/// Dark side of the Otsu split; the structures that get skeletonized.
pub fn inverted_mask(gray: &GrayImage) -> GrayImage {
    otsu_binarize(gray, true)
}

pub fn is_set(mask: &GrayImage, x: u32, y: u32) -> bool {
    mask.get_pixel(x, y)[0] != BACKGROUND
}

pub fn count_set(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != BACKGROUND).count()
}

/// Gaussian blur preprocessor for noise reduction
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { sigma: 1.0 }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.sigma.is_nan() || self.sigma <= 0.0 {
            return Err(RoadnetError::Config(format!(
                "blur sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn two_tone() -> GrayImage {
        GrayImage::from_fn(20, 10, |x, _| if x < 5 { Luma([10u8]) } else { Luma([240u8]) })
    }

    #[test]
    fn test_masks_are_complementary() {
        let gray = two_tone();
        let light = foreground_mask(&gray);
        let dark = inverted_mask(&gray);

        assert_eq!(count_set(&light), 15 * 10);
        assert_eq!(count_set(&dark), 5 * 10);
        for (x, y, p) in light.enumerate_pixels() {
            assert_ne!(p[0] == FOREGROUND, is_set(&dark, x, y));
        }
    }

    #[test]
    fn test_grayscale_from_color() {
        let mut rgb = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        rgb.put_pixel(1, 2, Rgb([0, 0, 0]));
        let gray = to_grayscale(&DynamicImage::ImageRgb8(rgb)).expect("Should convert");

        assert_eq!(gray.dimensions(), (4, 4));
        assert_eq!(gray.get_pixel(1, 2)[0], 0);
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_empty_image_is_invalid() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        assert!(matches!(to_grayscale(&empty), Err(RoadnetError::InvalidInput(_))));
    }

    #[test]
    fn test_blur_keeps_dimensions() {
        let blurred = GaussianBlurPreprocessor { sigma: 1.5 }
            .preprocess(&two_tone())
            .expect("Should blur");
        assert_eq!(blurred.dimensions(), (20, 10));

        let bad = GaussianBlurPreprocessor { sigma: 0.0 }.preprocess(&two_tone());
        assert!(matches!(bad, Err(RoadnetError::Config(_))));
    }
}
