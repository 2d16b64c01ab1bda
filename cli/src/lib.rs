use roadnet::{Pipeline, PipelineConfig, RoadnetError, SegmentMap};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Roadnet(#[from] RoadnetError),
    #[error("Job lists no images")]
    EmptyJob,
    #[error("Image name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// One image of a batch job
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImageJob {
    /// Output file stem
    pub name: String,
    pub path: String,
    /// Also write `<name>.geojson`
    #[serde(default)]
    pub geojson: bool,
}

/// Batch job file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BatchJob {
    pub output_dir: String,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub images: Vec<ImageJob>,
}

/// What a batch run produced
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl BatchJob {
    /// Load a job from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let job: BatchJob = toml::from_str(content)?;
        job.validate()?;
        Ok(job)
    }

    /// Load a job from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let job: BatchJob = serde_json::from_str(content)?;
        job.validate()?;
        Ok(job)
    }

    /// Auto-detect file format and load the job
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn validate(&self) -> Result<(), CliError> {
        if self.images.is_empty() {
            return Err(CliError::EmptyJob);
        }
        let mut names = HashSet::new();
        for image in &self.images {
            if !names.insert(image.name.as_str()) {
                return Err(CliError::DuplicateName(image.name.clone()));
            }
        }
        self.pipeline.validate()?;
        Ok(())
    }

    /// Process every image in order. A failing image is logged and recorded
    /// in the report; the remaining images still run.
    pub fn run(&self) -> Result<BatchReport, CliError> {
        let pipeline = Pipeline::from_config(&self.pipeline)?;
        let output_dir = Path::new(&self.output_dir);
        fs::create_dir_all(output_dir)?;

        let mut report = BatchReport::default();
        for image in &self.images {
            info!("Processing image '{}' from {}", image.name, image.path);
            match process_image(&pipeline, image, output_dir) {
                Ok(mut written) => report.written.append(&mut written),
                Err(e) => {
                    error!("Image '{}' failed: {}", image.name, e);
                    report.failed.push((image.name.clone(), e.to_string()));
                }
            }
        }

        info!(
            "Batch finished: {} files written, {} images failed",
            report.written.len(),
            report.failed.len()
        );
        Ok(report)
    }
}

fn process_image(pipeline: &Pipeline, image: &ImageJob, output_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let network = pipeline.process_path(&image.path)?;
    let mut written = Vec::new();

    let json_path = output_dir.join(format!("{}.json", image.name));
    fs::write(&json_path, SegmentMap::from_network(&network).to_json_string()?)?;
    written.push(json_path);

    if image.geojson {
        let geojson_path = output_dir.join(format!("{}.geojson", image.name));
        fs::write(&geojson_path, network.to_geojson_string()?)?;
        written.push(geojson_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn write_line_png(path: &Path) {
        let mut img = GrayImage::from_pixel(64, 21, Luma([255u8]));
        for x in 5..55 {
            img.put_pixel(x, 10, Luma([0u8]));
        }
        img.save(path).expect("Should write fixture");
    }

    #[test]
    fn test_job_from_toml() {
        let job = BatchJob::from_toml(
            r#"
output_dir = "out"

[pipeline]
epsilon = 10

[[images]]
name = "roads"
path = "roads.png"
geojson = true

[[images]]
name = "rivers"
path = "rivers.png"
"#,
        )
        .expect("Should parse");

        assert_eq!(job.pipeline.epsilon, 10);
        assert_eq!(job.pipeline.blur_sigma, None);
        assert_eq!(job.images.len(), 2);
        assert!(job.images[0].geojson);
        assert!(!job.images[1].geojson);
    }

    #[test]
    fn test_job_validation() {
        assert!(matches!(
            BatchJob::from_json(r#"{"output_dir":"out","images":[]}"#),
            Err(CliError::EmptyJob)
        ));
        assert!(matches!(
            BatchJob::from_json(
                r#"{"output_dir":"out","images":[{"name":"a","path":"x.png"},{"name":"a","path":"y.png"}]}"#
            ),
            Err(CliError::DuplicateName(name)) if name == "a"
        ));
        assert!(matches!(
            BatchJob::from_json(
                r#"{"output_dir":"out","pipeline":{"epsilon":0},"images":[{"name":"a","path":"x.png"}]}"#
            ),
            Err(CliError::Roadnet(RoadnetError::Config(_)))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            BatchJob::from_file("job.yaml"),
            Err(CliError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let image_path = dir.path().join("line.png");
        write_line_png(&image_path);
        let output_dir = dir.path().join("out");

        let job = BatchJob {
            output_dir: output_dir.to_string_lossy().into_owned(),
            pipeline: PipelineConfig::default(),
            images: vec![
                ImageJob {
                    name: "line".to_string(),
                    path: image_path.to_string_lossy().into_owned(),
                    geojson: true,
                },
                ImageJob {
                    name: "missing".to_string(),
                    path: dir.path().join("missing.png").to_string_lossy().into_owned(),
                    geojson: false,
                },
            ],
        };

        let job_path = dir.path().join("job.toml");
        fs::write(&job_path, job.to_toml().expect("Should serialize")).expect("Should write job");
        let job = BatchJob::from_file(&job_path).expect("Should load job");

        let report = job.run().expect("Should run");
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "missing");
        assert!(!report.is_success());

        let json = fs::read_to_string(output_dir.join("line.json")).expect("json output");
        assert_eq!(json, r#"{"z1":[5,10,20,10,35,10,50,10,54,10,1.0]}"#);
        assert!(output_dir.join("line.geojson").exists());
    }
}
