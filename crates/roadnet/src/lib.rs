//! # Road Network Extraction Library
//!
//! Turns a raster image of dark line structures (roads, rivers, vessels,
//! cracks) on a light background into a set of sampled polyline segments,
//! each annotated with its local width.
//!
//! The pipeline binarizes the image with Otsu's method, thins the dark
//! structures to a one-pixel skeleton, cuts the skeleton at its junctions,
//! traces every remaining arc from its endpoints, subsamples each arc and
//! probes the width of the structure at every sample.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roadnet::{Pipeline, SegmentMap};
//!
//! let pipeline = Pipeline::builder().build();
//! let network = pipeline.process_path("roads.png")?;
//!
//! // {"z1":[x1,y1,...,xn,yn,avg_width],"z2":[...]}
//! let json = SegmentMap::from_network(&network).to_json_string()?;
//! println!("{json}");
//!
//! network.save_geojson("roads.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use roadnet::{Pipeline, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .add_preprocessor(GaussianBlurPreprocessor { sigma: 1.0 })
//!     .set_skeletonizer(ZhangSuenSkeletonizer { max_iterations: Some(64) })
//!     .with_epsilon(10)
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod config;
pub mod io;
pub mod manager;
pub mod mcp;
pub mod typed_geojson;

pub use error::{Result, RoadnetError};
pub use types::{ExtractedNetwork, Interval, NetworkStats, Point, Segment};
pub use traits::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use config::PipelineConfig;
pub use io::{SegmentMap, SegmentRecord};
pub use manager::{SegmentManager, SegmentManagerCommand};
