use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadnetError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

impl From<toml::de::Error> for RoadnetError {
    fn from(err: toml::de::Error) -> Self {
        RoadnetError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoadnetError>;
