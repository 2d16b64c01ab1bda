use serde::{Deserialize, Serialize};
use geo_types::{Coord, LineString};

/// A skeleton pixel picked up while tracing, plus the local half-width
/// assigned later by the growing-circle probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub row: u32,
    pub col: u32,
    pub width: u32,
}

impl Point {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col, width: 1 }
    }

    /// True when the two points touch in the 8-neighbourhood.
    pub fn is_adjacent(&self, other: &Point) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr, dc) != (0, 0)
    }
}

/// One traced arc of the skeleton, ordered from the endpoint it was started
/// from to wherever the trace ran out of unvisited neighbours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    points: Vec<Point>,
    length: usize,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: u32, col: u32) {
        self.points.push(Point::new(row, col));
        self.length += 1;
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }
}

/// Fixed-stride subsample of a [`Segment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub points: Vec<Point>,
    /// Number of pixels in the segment this interval was sampled from
    pub traced_length: usize,
}

impl Interval {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of the sampled widths.
    pub fn avg_width(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let total: u64 = self.points.iter().map(|p| p.width as u64).sum();
        total as f64 / self.points.len() as f64
    }

    /// Convert to a geo-types LineString in image coordinates (x = col, y = row)
    pub fn to_line_string(&self) -> LineString<f64> {
        let coords: Vec<Coord<f64>> = self.points
            .iter()
            .map(|p| Coord { x: p.col as f64, y: p.row as f64 })
            .collect();
        LineString::new(coords)
    }

    /// Length of the sampled polyline in pixels
    pub fn polyline_length(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_line_string().euclidean_length()
    }
}

/// Pixel counts gathered while the pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub foreground_pixels: usize,
    pub skeleton_pixels: usize,
    pub junction_pixels: usize,
    pub endpoints: usize,
    pub traced_points: usize,
    pub sampled_points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedNetwork {
    /// Sampled segments in discovery order, widths filled in
    pub intervals: Vec<Interval>,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
    pub stats: NetworkStats,
}

impl ExtractedNetwork {
    pub fn segment_count(&self) -> usize {
        self.intervals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_length_tracks_points() {
        let mut segment = Segment::new();
        assert!(segment.is_empty());
        segment.push(3, 4);
        segment.push(3, 5);
        assert_eq!(segment.length(), 2);
        assert_eq!(segment.points().len(), segment.length());
        assert_eq!(segment.first(), Some(&Point::new(3, 4)));
        assert_eq!(segment.last().map(|p| p.width), Some(1));
    }

    #[test]
    fn test_point_adjacency() {
        let p = Point::new(5, 5);
        assert!(p.is_adjacent(&Point::new(4, 4)));
        assert!(p.is_adjacent(&Point::new(5, 6)));
        assert!(!p.is_adjacent(&Point::new(5, 5)));
        assert!(!p.is_adjacent(&Point::new(7, 5)));
    }

    #[test]
    fn test_interval_average_and_length() {
        let interval = Interval {
            points: vec![
                Point { row: 0, col: 0, width: 1 },
                Point { row: 0, col: 3, width: 3 },
                Point { row: 4, col: 3, width: 5 },
            ],
            traced_length: 8,
        };
        assert_eq!(interval.avg_width(), 3.0);
        assert!((interval.polyline_length() - 7.0).abs() < 1e-9);
    }
}
