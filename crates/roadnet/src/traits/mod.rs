use image::GrayImage;
use crate::error::Result;

/// Trait for grayscale preprocessing applied before binarization
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the input image (e.g., blur)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for thinning algorithms
pub trait Skeletonizer: Send + Sync {
    /// Reduce a 0/255 mask to a one-pixel-wide skeleton of the same size.
    /// Output pixels must be a subset of the input foreground.
    fn skeletonize(&self, mask: &GrayImage) -> Result<GrayImage>;
}
