use serde::{Deserialize, Serialize};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject};
use ts_rs::TS;
use schemars::JsonSchema;
use crate::error::{Result, RoadnetError};

/// Properties for traced segment features
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS, JsonSchema)]
#[ts(export)]
#[schemars(description = "Properties for traced segment features")]
pub struct SegmentProperties {
    #[schemars(description = "1-based discovery ordinal of the segment")]
    pub id: u32,
    #[schemars(description = "Key of the segment in the serialized segment map (z1, z2, ...)")]
    pub key: String,
    #[schemars(description = "Mean probed half-width over the sampled points, in pixels")]
    pub avg_width: f64,
    #[schemars(description = "Number of sampled points")]
    pub sample_count: usize,
    #[schemars(description = "Number of skeleton pixels in the traced segment")]
    pub traced_length: usize,
    #[schemars(description = "Length of the sampled polyline in pixels")]
    pub polyline_length: f64,
}

/// A segment geometry paired with its decoded properties
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SegmentFeature {
    pub geometry: Geometry,
    pub properties: SegmentProperties,
}

/// Typed view of an exported segment network.
///
/// Converts to and from a plain GeoJSON `FeatureCollection`; the image size
/// travels in the collection's foreign members.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SegmentCollection {
    pub image_width: u32,
    pub image_height: u32,
    pub features: Vec<SegmentFeature>,
}

impl SegmentCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Segments whose average width falls in `[min, max]`
    pub fn by_width_range(&self, min: f64, max: f64) -> Vec<&SegmentFeature> {
        self.features
            .iter()
            .filter(|f| f.properties.avg_width >= min && f.properties.avg_width <= max)
            .collect()
    }

    /// The segment with the largest average width; the first one wins ties
    pub fn widest(&self) -> Option<&SegmentFeature> {
        self.features.iter().reduce(|best, f| {
            if f.properties.avg_width > best.properties.avg_width { f } else { best }
        })
    }

    /// Summed polyline length of every segment
    pub fn total_length(&self) -> f64 {
        self.features.iter().map(|f| f.properties.polyline_length).sum()
    }

    pub fn to_feature_collection(&self) -> Result<FeatureCollection> {
        let mut features = Vec::with_capacity(self.features.len());
        for segment in &self.features {
            let properties = match serde_json::to_value(&segment.properties)? {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            };
            features.push(Feature {
                bbox: None,
                geometry: Some(segment.geometry.clone()),
                id: Some(Id::Number(serde_json::Number::from(segment.properties.id))),
                properties,
                foreign_members: None,
            });
        }

        let mut foreign_members = JsonObject::new();
        foreign_members.insert("image_width".to_string(), self.image_width.into());
        foreign_members.insert("image_height".to_string(), self.image_height.into());
        foreign_members.insert("segment_count".to_string(), self.features.len().into());

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Decode a collection previously written by [`Self::to_feature_collection`]
    pub fn from_feature_collection(fc: &FeatureCollection) -> Result<Self> {
        let dimension = |name: &str| -> Result<u32> {
            fc.foreign_members
                .as_ref()
                .and_then(|members| members.get(name))
                .and_then(|v| v.as_u64())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| RoadnetError::InvalidInput(format!("missing or invalid '{name}'")))
        };

        let features = fc.features
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                let geometry = feature.geometry.clone().ok_or_else(|| {
                    RoadnetError::InvalidInput(format!("feature {i} has no geometry"))
                })?;
                let properties = feature.properties.clone().ok_or_else(|| {
                    RoadnetError::InvalidInput(format!("feature {i} has no properties"))
                })?;
                let properties = serde_json::from_value(serde_json::Value::Object(properties))?;
                Ok(SegmentFeature { geometry, properties })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            image_width: dimension("image_width")?,
            image_height: dimension("image_height")?,
            features,
        })
    }
}
