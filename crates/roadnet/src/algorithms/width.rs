use image::GrayImage;
use crate::{
    algorithms::binarize::{count_set, is_set},
    error::{Result, RoadnetError},
    types::Interval,
};

/// Does the filled disk `x² + y² <= radius²` around `(row, col)`, clipped to
/// the image, touch any set pixel of `surface`?
fn disk_hits(surface: &GrayImage, row: u32, col: u32, radius: u32) -> bool {
    let r = radius as i64;
    let (row, col) = (row as i64, col as i64);
    let y0 = (row - r).max(0);
    let y1 = (row + r).min(surface.height() as i64 - 1);
    let x0 = (col - r).max(0);
    let x1 = (col + r).min(surface.width() as i64 - 1);

    for y in y0..=y1 {
        let dy = y - row;
        for x in x0..=x1 {
            let dx = x - col;
            if dx * dx + dy * dy <= r * r && is_set(surface, x as u32, y as u32) {
                return true;
            }
        }
    }
    false
}

/// Growing-circle probe: the smallest radius in 1, 3, 5, ... whose disk
/// around `(row, col)` reaches the surface.
pub fn probe_width(surface: &GrayImage, row: u32, col: u32) -> Result<u32> {
    let (w, h) = (surface.width() as u64, surface.height() as u64);
    // once the disk covers the whole frame there is nothing more to find
    let limit = ((w * w + h * h) as f64).sqrt().ceil() as u32 + 2;

    let mut radius = 1;
    while radius <= limit {
        if disk_hits(surface, row, col, radius) {
            return Ok(radius);
        }
        radius += 2;
    }
    Err(RoadnetError::DegenerateGeometry(format!(
        "width probe at ({row}, {col}) found no surface within radius {limit}"
    )))
}

/// Fill in `width` for every sampled point.
pub fn estimate_widths(intervals: &mut [Interval], surface: &GrayImage) -> Result<()> {
    if count_set(surface) == 0 {
        return Err(RoadnetError::InvalidInput(
            "width probe surface has no foreground pixels".to_string(),
        ));
    }
    for interval in intervals.iter_mut() {
        for point in interval.points.iter_mut() {
            point.width = probe_width(surface, point.row, point.col)?;
        }
    }
    Ok(())
}
