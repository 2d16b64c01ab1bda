use std::sync::Arc;

use image::DynamicImage;
use crate::{
    error::{Result, RoadnetError},
    config::validate_epsilon,
    types::ExtractedNetwork,
    pipeline::Pipeline,
};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, EnumIter, IntoStaticStr, VariantNames};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum SegmentManagerCommand {
    /// Extract the segment network with the manager's pipeline
    #[serde(rename = "extract_segments")]
    ExtractSegments,

    /// Extract the segment network with a different sampling stride
    #[serde(rename = "extract_segments_with_epsilon")]
    ExtractSegmentsWithEpsilon {
        #[schemars(range(min = 1, max = 500))]
        epsilon: usize,
    },
}

impl SegmentManagerCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SegmentManagerCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::ExtractSegments => "Skeletonize the image, split it at junctions and sample every segment",
            Self::ExtractSegmentsWithEpsilon { .. } => "Same as extract_segments with an explicit sampling stride",
        }
    }

    /// Get parameter requirements for the command
    pub fn parameters_info(&self) -> Vec<(&'static str, &'static str, bool)> {
        match self {
            Self::ExtractSegments => vec![],
            Self::ExtractSegmentsWithEpsilon { .. } => vec![
                ("epsilon", "Sampling stride in pixels (1-500)", true)
            ],
        }
    }
}

/// Holds one loaded image and the pipeline to run on it
#[derive(Clone)]
pub struct SegmentManager {
    image: Option<DynamicImage>,
    pipeline: Arc<Pipeline>,
}

impl SegmentManager {
    pub fn new() -> Self {
        Self {
            image: None,
            pipeline: Arc::new(Pipeline::builder().build()),
        }
    }

    /// Create a new SegmentManager with a custom pipeline
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            image: None,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Load an image from file
    pub fn load_image(&mut self, path: &str) -> Result<()> {
        self.image = Some(image::open(path)?);
        Ok(())
    }

    /// Load an encoded image from memory
    pub fn load_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.image = Some(image::load_from_memory(bytes)?);
        Ok(())
    }

    /// Set the image directly
    pub fn set_image(&mut self, image: DynamicImage) {
        self.image = Some(image);
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn execute(&self, command: SegmentManagerCommand) -> Result<ExtractedNetwork> {
        let image = self.image.as_ref()
            .ok_or(RoadnetError::NoImageLoaded)?;

        match command {
            SegmentManagerCommand::ExtractSegments => {
                self.pipeline.process(image)
            }
            SegmentManagerCommand::ExtractSegmentsWithEpsilon { epsilon } => {
                validate_epsilon(epsilon)?;
                self.pipeline.process_with_epsilon(image, epsilon)
            }
        }
    }
}

impl Default for SegmentManager {
    fn default() -> Self {
        Self::new()
    }
}
