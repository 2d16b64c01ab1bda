use crate::{
    pipeline::Pipeline,
    traits::{ImagePreprocessor, Skeletonizer},
    config::PipelineConfig,
    algorithms::{GaussianBlurPreprocessor, ZhangSuenSkeletonizer, DEFAULT_EPSILON},
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    skeletonizer: Option<Box<dyn Skeletonizer>>,
    epsilon: usize,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            skeletonizer: None,
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the skeletonizer (replaces any existing one)
    pub fn set_skeletonizer<S>(mut self, skeletonizer: S) -> Self
    where
        S: Skeletonizer + 'static,
    {
        self.skeletonizer = Some(Box::new(skeletonizer));
        self
    }

    /// Set the sampling stride
    pub fn with_epsilon(mut self, epsilon: usize) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Add Gaussian blur as a preprocessing step
    pub fn with_blur(self, sigma: f32) -> Self {
        self.add_preprocessor(GaussianBlurPreprocessor { sigma })
    }

    /// Apply every setting from a config
    pub fn with_config(self, config: &PipelineConfig) -> Self {
        let builder = self.with_epsilon(config.epsilon);
        match config.blur_sigma {
            Some(sigma) => builder.with_blur(sigma),
            None => builder,
        }
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let skeletonizer = self.skeletonizer
            .unwrap_or_else(|| Box::new(ZhangSuenSkeletonizer::default()));

        Pipeline::new(self.preprocessors, skeletonizer, self.epsilon)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
