use geojson::{FeatureCollection, Geometry, Value};
use crate::{
    error::Result,
    io::json::segment_key,
    types::ExtractedNetwork,
    typed_geojson::{SegmentCollection, SegmentFeature, SegmentProperties},
};

impl ExtractedNetwork {
    /// Typed view of the network: one LineString per interval in image
    /// coordinates (x = column, y = row)
    pub fn to_segment_collection(&self) -> SegmentCollection {
        let features = self.intervals
            .iter()
            .enumerate()
            .map(|(i, interval)| SegmentFeature {
                geometry: Geometry::new(Value::from(&interval.to_line_string())),
                properties: SegmentProperties {
                    id: (i + 1) as u32,
                    key: segment_key(i + 1),
                    avg_width: interval.avg_width(),
                    sample_count: interval.len(),
                    traced_length: interval.traced_length,
                    polyline_length: interval.polyline_length(),
                },
            })
            .collect();

        SegmentCollection {
            image_width: self.image_width,
            image_height: self.image_height,
            features,
        }
    }

    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        self.to_segment_collection().to_feature_collection()
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::typed_geojson::SegmentCollection;
    use crate::types::{ExtractedNetwork, Interval, NetworkStats, Point};

    fn network() -> ExtractedNetwork {
        ExtractedNetwork {
            intervals: vec![
                Interval {
                    points: vec![
                        Point { row: 2, col: 1, width: 1 },
                        Point { row: 2, col: 16, width: 1 },
                    ],
                    traced_length: 16,
                },
                Interval {
                    points: vec![
                        Point { row: 5, col: 5, width: 3 },
                        Point { row: 9, col: 8, width: 5 },
                    ],
                    traced_length: 5,
                },
            ],
            image_width: 20,
            image_height: 12,
            stats: NetworkStats::default(),
        }
    }

    #[test]
    fn test_geojson_linestrings() {
        let fc = network().to_geojson().expect("Should create GeoJSON");
        assert_eq!(fc.features.len(), 2);

        let geometry = fc.features[0].geometry.as_ref().expect("geometry");
        match &geometry.value {
            geojson::Value::LineString(coords) => {
                assert_eq!(coords, &vec![vec![1.0, 2.0], vec![16.0, 2.0]]);
            }
            other => panic!("expected a LineString, got {other:?}"),
        }

        let props = fc.features[1].properties.as_ref().expect("properties");
        assert_eq!(props.get("key").and_then(|v| v.as_str()), Some("z2"));
        assert_eq!(props.get("avg_width").and_then(|v| v.as_f64()), Some(4.0));
        assert_eq!(props.get("polyline_length").and_then(|v| v.as_f64()), Some(5.0));

        let foreign = fc.foreign_members.as_ref().expect("foreign members");
        assert_eq!(foreign.get("segment_count").and_then(|v| v.as_u64()), Some(2));
    }

    #[test]
    fn test_geojson_text_decodes_to_typed_collection() {
        let text = network().to_geojson_string().expect("Should serialize");
        let parsed: geojson::GeoJson = text.parse().expect("valid GeoJSON");
        let geojson::GeoJson::FeatureCollection(fc) = parsed else {
            panic!("expected a FeatureCollection");
        };

        let typed = SegmentCollection::from_feature_collection(&fc).expect("Should decode");
        assert_eq!(typed, network().to_segment_collection());
        assert_eq!((typed.image_width, typed.image_height), (20, 12));
        assert_eq!(typed.widest().map(|f| f.properties.key.as_str()), Some("z2"));
    }
}
