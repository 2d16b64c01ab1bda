use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize, Serializer,
};
use crate::{
    error::{Result, RoadnetError},
    types::{ExtractedNetwork, Interval},
};

/// One serialized segment: `[x1, y1, ..., xn, yn, avg_width]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRecord {
    /// Sample coordinates as `(x, y)`, i.e. `(col, row)`
    pub coords: Vec<(u32, u32)>,
    pub avg_width: f64,
}

impl SegmentRecord {
    pub fn from_interval(interval: &Interval) -> Self {
        Self {
            coords: interval.points.iter().map(|p| (p.col, p.row)).collect(),
            avg_width: interval.avg_width(),
        }
    }

    /// Flattened numeric form
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.coords.len() * 2 + 1);
        for &(x, y) in &self.coords {
            out.push(x as f64);
            out.push(y as f64);
        }
        out.push(self.avg_width);
        out
    }
}

impl Serialize for SegmentRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.coords.len() * 2 + 1))?;
        for &(x, y) in &self.coords {
            seq.serialize_element(&x)?;
            seq.serialize_element(&y)?;
        }
        seq.serialize_element(&self.avg_width)?;
        seq.end()
    }
}

/// Segment records keyed `z1`, `z2`, ... in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMap {
    records: Vec<SegmentRecord>,
}

pub fn segment_key(ordinal: usize) -> String {
    format!("z{ordinal}")
}

fn pixel_coordinate(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&value)).then_some(value as u32)
}

fn parse_key(key: &str) -> Option<usize> {
    key.strip_prefix('z')?.parse().ok().filter(|&n| n >= 1)
}

impl SegmentMap {
    pub fn from_intervals(intervals: &[Interval]) -> Self {
        Self {
            records: intervals.iter().map(SegmentRecord::from_interval).collect(),
        }
    }

    pub fn from_network(network: &ExtractedNetwork) -> Self {
        Self::from_intervals(&network.intervals)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SegmentRecord> {
        parse_key(key).and_then(|n| self.records.get(n - 1))
    }

    /// `(key, record)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (String, &SegmentRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| (segment_key(i + 1), record))
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a serialized map back. Keys must be `z1..zN` without gaps and
    /// every array must hold coordinate pairs plus one trailing width.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            RoadnetError::InvalidInput("segment map must be a JSON object".to_string())
        })?;

        let mut keyed = Vec::with_capacity(object.len());
        for (key, entry) in object {
            let ordinal = parse_key(key)
                .ok_or_else(|| RoadnetError::InvalidInput(format!("unexpected key '{key}'")))?;
            let numbers: Vec<f64> = entry
                .as_array()
                .ok_or_else(|| RoadnetError::InvalidInput(format!("'{key}' is not an array")))?
                .iter()
                .map(|v| v.as_f64())
                .collect::<Option<_>>()
                .ok_or_else(|| RoadnetError::InvalidInput(format!("'{key}' has non-numeric entries")))?;
            if numbers.len() < 3 || numbers.len() % 2 == 0 {
                return Err(RoadnetError::InvalidInput(format!(
                    "'{key}' has {} entries; expected an odd count of at least 3",
                    numbers.len()
                )));
            }

            let (pairs, width) = numbers.split_at(numbers.len() - 1);
            let coords = pairs
                .chunks_exact(2)
                .map(|xy| Some((pixel_coordinate(xy[0])?, pixel_coordinate(xy[1])?)))
                .collect::<Option<_>>()
                .ok_or_else(|| {
                    RoadnetError::InvalidInput(format!(
                        "'{key}' has coordinates that are not non-negative integers"
                    ))
                })?;
            keyed.push((ordinal, SegmentRecord { coords, avg_width: width[0] }));
        }

        keyed.sort_by_key(|(ordinal, _)| *ordinal);
        for (expected, (ordinal, _)) in keyed.iter().enumerate() {
            if *ordinal != expected + 1 {
                return Err(RoadnetError::InvalidInput(format!(
                    "segment keys are not contiguous: missing z{}",
                    expected + 1
                )));
            }
        }

        Ok(Self {
            records: keyed.into_iter().map(|(_, record)| record).collect(),
        })
    }
}

impl Serialize for SegmentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (key, record) in self.iter() {
            map.serialize_entry(&key, record)?;
        }
        map.end()
    }
}

impl ExtractedNetwork {
    /// Serialize as the `z1..zN` segment map
    pub fn to_json_string(&self) -> Result<String> {
        SegmentMap::from_network(self).to_json_string()
    }
}
