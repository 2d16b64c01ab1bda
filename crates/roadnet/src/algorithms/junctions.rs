use image::{GrayImage, Luma};
use imageproc::{distance_transform::Norm, morphology::dilate};
use crate::algorithms::{
    binarize::otsu_binarize,
    hit_or_miss::{match_bank, JUNCTION_BANK},
};

/// Mark skeleton pixels whose neighbourhood matches any junction pattern.
pub fn detect_junctions(skeleton: &GrayImage) -> GrayImage {
    match_bank(skeleton, &JUNCTION_BANK)
}

/// Cut the skeleton apart at its junctions: grow every junction pixel to
/// its 3×3 neighbourhood, subtract that from the skeleton and re-binarize.
/// What is left is a set of disjoint arcs.
pub fn remove_junctions(skeleton: &GrayImage, junctions: &GrayImage) -> GrayImage {
    let grown = dilate(junctions, Norm::LInf, 1);
    let difference = GrayImage::from_fn(skeleton.width(), skeleton.height(), |x, y| {
        Luma([skeleton.get_pixel(x, y)[0].saturating_sub(grown.get_pixel(x, y)[0])])
    });
    otsu_binarize(&difference, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{
        binarize::{count_set, is_set, FOREGROUND},
        hit_or_miss::set_pixels_row_major,
    };

    fn plus(size: u32, centre: u32, arm: u32) -> GrayImage {
        let mut mask = GrayImage::new(size, size);
        for i in centre - arm..=centre + arm {
            mask.put_pixel(i, centre, Luma([FOREGROUND]));
            mask.put_pixel(centre, i, Luma([FOREGROUND]));
        }
        mask
    }

    #[test]
    fn test_plus_is_split_into_four_arms() {
        let skeleton = plus(41, 20, 15);
        let junctions = detect_junctions(&skeleton);
        assert_eq!(set_pixels_row_major(&junctions), vec![(20, 20)]);

        let arcs = remove_junctions(&skeleton, &junctions);
        // centre and its four direct neighbours disappear
        assert_eq!(count_set(&arcs), count_set(&skeleton) - 5);
        for (x, y) in [(20, 20), (19, 20), (21, 20), (20, 19), (20, 21)] {
            assert!(!is_set(&arcs, x, y));
        }
        assert!(is_set(&arcs, 20, 18));
        assert!(is_set(&arcs, 22, 20));
    }

    #[test]
    fn test_no_junctions_leaves_skeleton_untouched() {
        let mut line = GrayImage::new(30, 5);
        for x in 3..27 {
            line.put_pixel(x, 2, Luma([FOREGROUND]));
        }
        let junctions = detect_junctions(&line);
        assert_eq!(count_set(&junctions), 0);
        assert_eq!(remove_junctions(&line, &junctions), line);
    }
}
