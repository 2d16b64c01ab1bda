use image::{GrayImage, Luma};
use crate::algorithms::binarize::{is_set, BACKGROUND, FOREGROUND};

/// A 3×3 hit-or-miss pair. `hit` cells must be set, `miss` cells must be
/// clear, cells in neither are ignored. Rows run top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    pub hit: [[u8; 3]; 3],
    pub miss: [[u8; 3]; 3],
}

impl StructuringElement {
    /// Exact-match element: everything outside `hit` must be background.
    pub const fn strict(hit: [[u8; 3]; 3]) -> Self {
        let mut miss = [[0u8; 3]; 3];
        let mut r = 0;
        while r < 3 {
            let mut c = 0;
            while c < 3 {
                miss[r][c] = 1 - hit[r][c];
                c += 1;
            }
            r += 1;
        }
        Self { hit, miss }
    }

    /// Strict element with one cell left unconstrained.
    pub const fn ignoring(hit: [[u8; 3]; 3], row: usize, col: usize) -> Self {
        let mut element = Self::strict(hit);
        element.miss[row][col] = 0;
        element
    }

    /// Test the element centred on `(x, y)`. Windows that would leave the
    /// image never match.
    pub fn matches(&self, mask: &GrayImage, x: u32, y: u32) -> bool {
        if x == 0 || y == 0 || x + 1 >= mask.width() || y + 1 >= mask.height() {
            return false;
        }
        for r in 0..3 {
            for c in 0..3 {
                let set = is_set(mask, x + c as u32 - 1, y + r as u32 - 1);
                if (self.hit[r][c] == 1 && !set) || (self.miss[r][c] == 1 && set) {
                    return false;
                }
            }
        }
        true
    }
}

/// Branch-point neighbourhoods: Y shapes, diagonal X and T shapes in every
/// rotation and reflection. The T shapes leave their open 4-neighbour
/// unconstrained so a four-way crossing fires at its centre pixel.
pub const JUNCTION_BANK: [StructuringElement; 16] = [
    StructuringElement::strict([[1, 0, 1], [0, 1, 0], [0, 1, 0]]),
    StructuringElement::strict([[0, 1, 0], [0, 1, 1], [1, 0, 0]]),
    StructuringElement::strict([[0, 0, 1], [1, 1, 0], [0, 0, 1]]),
    StructuringElement::strict([[1, 0, 0], [0, 1, 1], [0, 1, 0]]),
    StructuringElement::strict([[0, 1, 0], [0, 1, 0], [1, 0, 1]]),
    StructuringElement::strict([[0, 0, 1], [1, 1, 0], [0, 1, 0]]),
    StructuringElement::strict([[1, 0, 0], [0, 1, 1], [1, 0, 0]]),
    StructuringElement::strict([[0, 1, 0], [1, 1, 0], [0, 0, 1]]),
    StructuringElement::strict([[1, 0, 0], [0, 1, 0], [1, 0, 1]]),
    StructuringElement::strict([[1, 0, 1], [0, 1, 0], [1, 0, 1]]),
    StructuringElement::strict([[1, 0, 1], [0, 1, 0], [0, 0, 1]]),
    StructuringElement::strict([[0, 0, 1], [0, 1, 0], [1, 0, 1]]),
    StructuringElement::ignoring([[0, 1, 0], [1, 1, 1], [0, 0, 0]], 2, 1),
    StructuringElement::ignoring([[0, 1, 0], [0, 1, 1], [0, 1, 0]], 1, 0),
    StructuringElement::ignoring([[0, 1, 0], [1, 1, 0], [0, 1, 0]], 1, 2),
    StructuringElement::ignoring([[0, 0, 0], [1, 1, 1], [0, 1, 0]], 0, 1),
];

/// Line ends: exactly one live neighbour, in each of the 8 directions.
pub const ENDPOINT_BANK: [StructuringElement; 8] = [
    StructuringElement::strict([[0, 0, 0], [1, 1, 0], [0, 0, 0]]),
    StructuringElement::strict([[0, 0, 0], [0, 1, 0], [0, 1, 0]]),
    StructuringElement::strict([[0, 0, 0], [0, 1, 1], [0, 0, 0]]),
    StructuringElement::strict([[0, 1, 0], [0, 1, 0], [0, 0, 0]]),
    StructuringElement::strict([[0, 0, 0], [0, 1, 0], [1, 0, 0]]),
    StructuringElement::strict([[0, 0, 0], [0, 1, 0], [0, 0, 1]]),
    StructuringElement::strict([[0, 0, 1], [0, 1, 0], [0, 0, 0]]),
    StructuringElement::strict([[1, 0, 0], [0, 1, 0], [0, 0, 0]]),
];

/// Hit-or-miss transform for a single element.
pub fn hit_or_miss(mask: &GrayImage, element: &StructuringElement) -> GrayImage {
    match_bank(mask, std::slice::from_ref(element))
}

/// Pixel-wise OR of the hit-or-miss transforms of every element in `bank`.
pub fn match_bank(mask: &GrayImage, bank: &[StructuringElement]) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if is_set(mask, x, y) && bank.iter().any(|element| element.matches(mask, x, y)) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Coordinates `(row, col)` of set pixels, top-to-bottom then left-to-right.
pub fn set_pixels_row_major(mask: &GrayImage) -> Vec<(u32, u32)> {
    let mut out = Vec::new();
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if is_set(mask, x, y) {
                out.push((y, x));
            }
        }
    }
    out
}
