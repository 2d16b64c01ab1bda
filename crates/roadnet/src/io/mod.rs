pub mod json;
pub mod geojson;

pub use json::{SegmentMap, SegmentRecord};
