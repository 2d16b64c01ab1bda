use image::GrayImage;
use crate::{
    algorithms::{
        binarize::is_set,
        hit_or_miss::{match_bank, set_pixels_row_major, ENDPOINT_BANK},
    },
    error::{Result, RoadnetError},
    types::Segment,
};

/// State of one pixel of the tracing working copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Background,
    Unvisited,
    Visited,
}

/// Working copy of the arc mask. Each pipeline run owns its own.
#[derive(Debug, Clone)]
pub struct TraceGrid {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl TraceGrid {
    pub fn from_mask(mask: &GrayImage) -> Self {
        let cells = mask
            .pixels()
            .map(|p| if p[0] == 0 { CellState::Background } else { CellState::Unvisited })
            .collect();
        Self { width: mask.width(), height: mask.height(), cells }
    }

    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    pub fn state(&self, row: u32, col: u32) -> CellState {
        self.cells[self.index(row, col)]
    }

    fn mark_visited(&mut self, row: u32, col: u32) {
        let i = self.index(row, col);
        self.cells[i] = CellState::Visited;
    }

    /// Next pixel to walk to from `(row, col)`. The neighbourhood is scanned
    /// row offset -1..=1 then column offset -1..=1, and the last unvisited
    /// foreground pixel seen wins.
    fn next_step(&self, row: u32, col: u32) -> Option<(u32, u32)> {
        let mut found = None;
        for dr in -1i64..=1 {
            let r = row as i64 + dr;
            if r < 0 || r >= self.height as i64 {
                continue;
            }
            for dc in -1i64..=1 {
                let c = col as i64 + dc;
                if c < 0 || c >= self.width as i64 {
                    continue;
                }
                if self.state(r as u32, c as u32) == CellState::Unvisited {
                    found = Some((r as u32, c as u32));
                }
            }
        }
        found
    }

    /// Walk one arc starting at `(row, col)`, consuming every pixel it visits.
    pub fn trace_from(&mut self, row: u32, col: u32) -> Segment {
        let mut segment = Segment::new();
        segment.push(row, col);
        self.mark_visited(row, col);

        let (mut row, mut col) = (row, col);
        while let Some((next_row, next_col)) = self.next_step(row, col) {
            segment.push(next_row, next_col);
            self.mark_visited(next_row, next_col);
            row = next_row;
            col = next_col;
        }
        segment
    }
}

/// Arc endpoints `(row, col)` in row-major order.
pub fn find_endpoints(arcs: &GrayImage) -> Vec<(u32, u32)> {
    set_pixels_row_major(&match_bank(arcs, &ENDPOINT_BANK))
}

/// Trace one segment per not-yet-consumed endpoint, in endpoint order.
/// The far end of an arc is consumed by the trace that reaches it, so each
/// open arc yields exactly one segment.
pub fn trace_segments(arcs: &GrayImage, endpoints: &[(u32, u32)]) -> Result<Vec<Segment>> {
    let mut grid = TraceGrid::from_mask(arcs);
    let mut segments = Vec::new();

    for &(row, col) in endpoints {
        if !is_set(arcs, col, row) {
            return Err(RoadnetError::InvalidInput(format!(
                "endpoint ({row}, {col}) is not on the arc mask"
            )));
        }
        if grid.state(row, col) == CellState::Visited {
            continue;
        }

        let segment = grid.trace_from(row, col);
        if segment.is_empty() {
            return Err(RoadnetError::DegenerateGeometry(format!(
                "trace from ({row}, {col}) produced no points"
            )));
        }
        if segment.length() == 1 {
            tracing::warn!(row, col, "single-pixel segment");
        }
        segments.push(segment);
    }

    Ok(segments)
}
