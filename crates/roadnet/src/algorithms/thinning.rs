use image::{GrayImage, Luma};
use crate::{
    algorithms::binarize::{BACKGROUND, FOREGROUND},
    error::Result,
    traits::Skeletonizer,
};

/// 8-neighbourhood offsets `(dx, dy)` clockwise from north.
/// Even indices are the 4-neighbours.
const RING: [(i32, i32); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Peels south and east boundary pixels
    SouthEast,
    /// Peels north and west boundary pixels
    NorthWest,
}

/// Zhang-Suen style thinning.
///
/// Each iteration runs two directional sub-passes. Candidates are collected
/// against the state at the start of the sub-pass, then deleted one by one
/// with the full deletion test re-evaluated against the live grid, so every
/// deletion removes an 8-simple point. That keeps the number of 8-connected
/// components (and holes) unchanged while still stripping the staircase
/// corners classic Zhang-Suen leaves behind.
#[derive(Debug, Clone, Default)]
pub struct ZhangSuenSkeletonizer {
    /// Stop after this many full iterations; `None` runs to convergence
    pub max_iterations: Option<usize>,
}

impl Skeletonizer for ZhangSuenSkeletonizer {
    fn skeletonize(&self, mask: &GrayImage) -> Result<GrayImage> {
        let mut grid = Grid::from_mask(mask);
        let mut iterations = 0usize;

        loop {
            if self.max_iterations.is_some_and(|max| iterations >= max) {
                break;
            }
            let removed = grid.thin_pass(Pass::SouthEast) + grid.thin_pass(Pass::NorthWest);
            iterations += 1;
            if removed == 0 {
                break;
            }
        }

        tracing::debug!(iterations, "thinning converged");
        Ok(grid.into_mask())
    }
}

struct Grid {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Grid {
    fn from_mask(mask: &GrayImage) -> Self {
        Self {
            width: mask.width(),
            height: mask.height(),
            cells: mask.pixels().map(|p| p[0] != BACKGROUND).collect(),
        }
    }

    fn into_mask(self) -> GrayImage {
        let width = self.width;
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.cells[(y * width + x) as usize] {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        })
    }

    fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.cells[(y as u64 * self.width as u64 + x as u64) as usize]
    }

    fn neighbours(&self, x: u32, y: u32) -> [bool; 8] {
        let mut out = [false; 8];
        for (slot, (dx, dy)) in out.iter_mut().zip(RING) {
            *slot = self.get(x as i64 + dx as i64, y as i64 + dy as i64);
        }
        out
    }

    fn is_deletable(&self, x: u32, y: u32, pass: Pass) -> bool {
        let n = self.neighbours(x, y);
        let count = n.iter().filter(|&&v| v).count();
        if !(2..=6).contains(&count) || connectivity_number(&n) != 1 {
            return false;
        }

        let [north, _, east, _, south, _, west, _] = n;
        match pass {
            Pass::SouthEast => !(north && east && south) && !(east && south && west),
            Pass::NorthWest => !(north && east && west) && !(north && south && west),
        }
    }

    /// Run one directional sub-pass, returning how many pixels were removed.
    fn thin_pass(&mut self, pass: Pass) -> usize {
        let mut candidates = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[(y * self.width + x) as usize] && self.is_deletable(x, y, pass) {
                    candidates.push((x, y));
                }
            }
        }

        let mut removed = 0;
        for (x, y) in candidates {
            if self.is_deletable(x, y, pass) {
                self.cells[(y * self.width + x) as usize] = false;
                removed += 1;
            }
        }
        removed
    }
}

/// Yokoi 8-connectivity number of a neighbourhood in `RING` order.
/// A foreground pixel is 8-simple exactly when this equals 1.
fn connectivity_number(n: &[bool; 8]) -> u8 {
    let off = |i: usize| !n[i % 8];
    [0usize, 2, 4, 6]
        .iter()
        .map(|&k| (off(k) && !(off(k + 1) && off(k + 2))) as u8)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::binarize::count_set;
    use imageproc::region_labelling::{connected_components, Connectivity};

    fn component_count(mask: &GrayImage) -> u32 {
        let labels = connected_components(mask, Connectivity::Eight, Luma([BACKGROUND]));
        labels.pixels().map(|p| p[0]).max().unwrap_or(0)
    }

    fn has_full_2x2(mask: &GrayImage) -> bool {
        (0..mask.height() - 1).any(|y| {
            (0..mask.width() - 1).any(|x| {
                [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)]
                    .iter()
                    .all(|&(px, py)| mask.get_pixel(px, py)[0] == FOREGROUND)
            })
        })
    }

    fn thick_bar() -> GrayImage {
        GrayImage::from_fn(50, 20, |x, y| {
            if (5..45).contains(&x) && (8..13).contains(&y) { Luma([FOREGROUND]) } else { Luma([BACKGROUND]) }
        })
    }

    fn ring() -> GrayImage {
        GrayImage::from_fn(30, 30, |x, y| {
            let d = (x as i32 - 15).pow(2) + (y as i32 - 15).pow(2);
            if (64..=144).contains(&d) { Luma([FOREGROUND]) } else { Luma([BACKGROUND]) }
        })
    }

    fn two_blobs() -> GrayImage {
        GrayImage::from_fn(40, 40, |x, y| {
            let a = (3..15).contains(&x) && (3..9).contains(&y);
            let b = (20..36).contains(&x) && (20..38).contains(&y);
            if a || b { Luma([FOREGROUND]) } else { Luma([BACKGROUND]) }
        })
    }

    #[test]
    fn test_skeleton_is_subset_and_preserves_components() {
        let skeletonizer = ZhangSuenSkeletonizer::default();
        for mask in [thick_bar(), ring(), two_blobs()] {
            let skeleton = skeletonizer.skeletonize(&mask).expect("Should thin");
            for (x, y, p) in skeleton.enumerate_pixels() {
                if p[0] == FOREGROUND {
                    assert_eq!(mask.get_pixel(x, y)[0], FOREGROUND, "({x},{y}) not in input");
                }
            }
            assert_eq!(component_count(&mask), component_count(&skeleton));
            assert!(!has_full_2x2(&skeleton), "skeleton should be one pixel wide");
        }
    }

    #[test]
    fn test_bar_thins_to_a_line() {
        let skeleton = ZhangSuenSkeletonizer::default()
            .skeletonize(&thick_bar())
            .expect("Should thin");
        let remaining = count_set(&skeleton);
        assert!(remaining >= 35 && remaining <= 45, "got {remaining} pixels");
    }

    #[test]
    fn test_one_pixel_line_is_stable() {
        let mut line = GrayImage::new(60, 9);
        for x in 5..55 {
            line.put_pixel(x, 4, Luma([FOREGROUND]));
        }
        let skeleton = ZhangSuenSkeletonizer::default().skeletonize(&line).expect("Should thin");
        assert_eq!(skeleton, line);
    }

    #[test]
    fn test_isolated_square_survives() {
        let mut mask = GrayImage::new(6, 6);
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
        let skeleton = ZhangSuenSkeletonizer::default().skeletonize(&mask).expect("Should thin");
        assert_eq!(component_count(&skeleton), 1);
        assert!(count_set(&skeleton) >= 1 && count_set(&skeleton) < 4);
    }

    #[test]
    fn test_connectivity_number() {
        // isolated interior of a straight line: two separate neighbours
        let line = [true, false, false, false, true, false, false, false];
        assert_eq!(connectivity_number(&line), 2);
        // staircase corner: west and south only
        let corner = [false, false, false, false, true, false, true, false];
        assert_eq!(connectivity_number(&corner), 1);
        // plus centre keeps all four arms
        let plus = [true, false, true, false, true, false, true, false];
        assert_eq!(connectivity_number(&plus), 0);
    }
}
