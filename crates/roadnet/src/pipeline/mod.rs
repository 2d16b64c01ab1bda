pub mod builder;

use std::path::Path;
use image::{DynamicImage, GrayImage};
use crate::{
    algorithms::{
        binarize::{count_set, foreground_mask, inverted_mask, to_grayscale},
        junctions::{detect_junctions, remove_junctions},
        sampling::build_intervals,
        trace::{find_endpoints, trace_segments},
        width::estimate_widths,
    },
    config::{validate_epsilon, PipelineConfig},
    error::{Result, RoadnetError},
    io::json::SegmentMap,
    traits::{ImagePreprocessor, Skeletonizer},
    types::{ExtractedNetwork, NetworkStats},
};

/// The skeleton-to-segments pipeline. Holds no state between runs apart
/// from its configuration, so one instance can serve any number of images.
pub struct Pipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    skeletonizer: Box<dyn Skeletonizer>,
    epsilon: usize,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        skeletonizer: Box<dyn Skeletonizer>,
        epsilon: usize,
    ) -> Self {
        Self {
            preprocessors,
            skeletonizer,
            epsilon,
        }
    }

    /// Validate a config and build the matching pipeline
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::builder().with_config(config).build())
    }

    pub fn epsilon(&self) -> usize {
        self.epsilon
    }

    /// Decode an image file and process it
    pub fn process_path<P: AsRef<Path>>(&self, path: P) -> Result<ExtractedNetwork> {
        let image = image::open(path)?;
        self.process(&image)
    }

    /// Decode an in-memory encoded image and process it
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ExtractedNetwork> {
        let image = image::load_from_memory(bytes)?;
        self.process(&image)
    }

    /// Process a decoded image through the entire pipeline
    pub fn process(&self, image: &DynamicImage) -> Result<ExtractedNetwork> {
        let gray = to_grayscale(image)?;
        self.process_gray(&gray)
    }

    /// Run every configured stage but sample at `epsilon` instead of the
    /// pipeline's own stride
    pub fn process_with_epsilon(&self, image: &DynamicImage, epsilon: usize) -> Result<ExtractedNetwork> {
        let gray = to_grayscale(image)?;
        self.process_gray_with_epsilon(&gray, epsilon)
    }

    /// Process an already grayscale image
    pub fn process_gray(&self, image: &GrayImage) -> Result<ExtractedNetwork> {
        self.process_gray_with_epsilon(image, self.epsilon)
    }

    pub fn process_gray_with_epsilon(&self, image: &GrayImage, epsilon: usize) -> Result<ExtractedNetwork> {
        validate_epsilon(epsilon)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(RoadnetError::InvalidInput("image is empty".to_string()));
        }

        // Step 1: Apply all preprocessors in sequence
        let mut gray = image.clone();
        for preprocessor in &self.preprocessors {
            gray = preprocessor.preprocess(&gray)?;
        }

        // Step 2: Binarize. Dark pixels are the structures, light pixels the
        // surface the width probe searches for.
        let structures = inverted_mask(&gray);
        let surface = foreground_mask(&gray);
        let foreground_pixels = count_set(&structures);
        if foreground_pixels == 0 {
            return Err(RoadnetError::InvalidInput(
                "no foreground pixels after thresholding".to_string(),
            ));
        }
        if count_set(&surface) == 0 {
            return Err(RoadnetError::InvalidInput(
                "no background pixels after thresholding".to_string(),
            ));
        }

        // Step 3: Thin to a one-pixel skeleton
        let skeleton = self.skeletonizer.skeletonize(&structures)?;
        let skeleton_pixels = count_set(&skeleton);
        tracing::debug!(foreground_pixels, skeleton_pixels, "skeletonized");

        // Step 4: Cut the skeleton at its junctions
        let junctions = detect_junctions(&skeleton);
        let junction_pixels = count_set(&junctions);
        let arcs = remove_junctions(&skeleton, &junctions);

        // Step 5: Trace every arc from its endpoints
        let endpoints = find_endpoints(&arcs);
        let segments = trace_segments(&arcs, &endpoints)?;
        tracing::debug!(junction_pixels, endpoints = endpoints.len(), segments = segments.len(), "traced");

        // Step 6: Sample and measure
        let mut intervals = build_intervals(&segments, epsilon)?;
        estimate_widths(&mut intervals, &surface)?;

        let stats = NetworkStats {
            foreground_pixels,
            skeleton_pixels,
            junction_pixels,
            endpoints: endpoints.len(),
            traced_points: segments.iter().map(|s| s.length()).sum(),
            sampled_points: intervals.iter().map(|i| i.len()).sum(),
        };
        tracing::info!(
            width = image.width(),
            height = image.height(),
            segments = intervals.len(),
            "extracted segment network"
        );

        Ok(ExtractedNetwork {
            intervals,
            image_width: image.width(),
            image_height: image.height(),
            stats,
        })
    }

    /// Process an image and serialize the result as the `z1..zN` segment map
    pub fn extract_json(&self, image: &DynamicImage) -> Result<String> {
        let network = self.process(image)?;
        SegmentMap::from_network(&network).to_json_string()
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} preprocessors, 1 skeletonizer, epsilon = {}",
            self.preprocessors.len(),
            self.epsilon
        )
    }
}
