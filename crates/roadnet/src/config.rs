use std::{fs, path::Path};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::{
    algorithms::sampling::DEFAULT_EPSILON,
    error::{Result, RoadnetError},
};

/// Largest accepted sampling stride
pub const MAX_EPSILON: usize = 500;

/// Reject strides outside `1..=MAX_EPSILON`
pub fn validate_epsilon(epsilon: usize) -> Result<()> {
    if !(1..=MAX_EPSILON).contains(&epsilon) {
        return Err(RoadnetError::Config(format!(
            "epsilon must be between 1 and {MAX_EPSILON}, got {epsilon}"
        )));
    }
    Ok(())
}

/// Tunable parameters of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sampling stride along each traced segment, in pixels
    #[schemars(range(min = 1, max = 500))]
    pub epsilon: usize,
    /// Gaussian blur applied to the grayscale image before thresholding
    pub blur_sigma: Option<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            blur_sigma: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)?;
        if let Some(sigma) = self.blur_sigma {
            if sigma.is_nan() || sigma <= 0.0 {
                return Err(RoadnetError::Config(format!(
                    "blur_sigma must be positive, got {sigma}"
                )));
            }
        }
        Ok(())
    }

    /// Parse from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format from the extension and load
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref)?;
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(RoadnetError::Config(format!(
                "unsupported config format for {}; use .toml or .json",
                path_ref.display()
            ))),
        }
    }
}
