use crate::{
    error::{Result, RoadnetError},
    types::{Interval, Segment},
};

/// Default sampling stride in pixels
pub const DEFAULT_EPSILON: usize = 15;

/// Subsample a segment every `epsilon` points.
///
/// With `L` points and `d = ceil(L / epsilon)` the interval holds `d + 1`
/// samples: indices `0, epsilon, ..., (d - 1) * epsilon` followed by the
/// final point `L - 1`.
pub fn build_interval(segment: &Segment, epsilon: usize) -> Result<Interval> {
    if epsilon == 0 {
        return Err(RoadnetError::InvalidInput("epsilon must be at least 1".to_string()));
    }
    let length = segment.length();
    if length == 0 {
        return Err(RoadnetError::DegenerateGeometry(
            "cannot sample a segment with no points".to_string(),
        ));
    }

    let points = segment.points();
    let d = length.div_ceil(epsilon);
    let sampled = (0..=d)
        .map(|i| if i < d { points[i * epsilon] } else { points[length - 1] })
        .collect();

    Ok(Interval { points: sampled, traced_length: length })
}

pub fn build_intervals(segments: &[Segment], epsilon: usize) -> Result<Vec<Interval>> {
    segments
        .iter()
        .map(|segment| build_interval(segment, epsilon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(length: u32) -> Segment {
        let mut segment = Segment::new();
        for col in 0..length {
            segment.push(7, col);
        }
        segment
    }

    fn sampled_cols(interval: &Interval) -> Vec<u32> {
        interval.points.iter().map(|p| p.col).collect()
    }

    #[test]
    fn test_fifty_points_default_stride() {
        let interval = build_interval(&straight(50), DEFAULT_EPSILON).expect("Should sample");
        assert_eq!(sampled_cols(&interval), vec![0, 15, 30, 45, 49]);
        assert_eq!(interval.traced_length, 50);
    }

    #[test]
    fn test_sample_count_and_end_points() {
        for length in 1..70u32 {
            for epsilon in [1usize, 2, 7, 15, 30] {
                let segment = straight(length);
                let interval = build_interval(&segment, epsilon).expect("Should sample");
                assert_eq!(interval.len(), (length as usize).div_ceil(epsilon) + 1);
                assert_eq!(interval.points.first(), segment.first());
                assert_eq!(interval.points.last(), segment.last());
                for pair in interval.points.windows(2) {
                    assert!(pair[1].col - pair[0].col <= epsilon as u32);
                }
            }
        }
    }

    #[test]
    fn test_exact_multiple_of_stride() {
        let interval = build_interval(&straight(30), 15).expect("Should sample");
        assert_eq!(sampled_cols(&interval), vec![0, 15, 29]);
    }

    #[test]
    fn test_single_point_segment_repeats_its_point() {
        let interval = build_interval(&straight(1), 15).expect("Should sample");
        assert_eq!(sampled_cols(&interval), vec![0, 0]);

        let interval = build_interval(&straight(16), 15).expect("Should sample");
        assert_eq!(sampled_cols(&interval), vec![0, 15, 15]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(build_interval(&straight(5), 0), Err(RoadnetError::InvalidInput(_))));
        assert!(matches!(
            build_interval(&Segment::new(), 15),
            Err(RoadnetError::DegenerateGeometry(_))
        ));
    }
}
