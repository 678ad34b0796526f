use serde::Serialize;
use tracing::{debug, instrument};

use super::{CutterBox, CutterSet, SeamError, SeamSide};
use crate::body::{CaseDimensions, ScrewBoss};
use crate::geometry::{Box3, Point3d};

/// The part of the bottom cover printed with one section (case-space millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BottomSlab {
    pub index: usize,
    pub count: usize,
    pub start_x: f64,
    pub end_x: f64,
}

impl BottomSlab {
    pub fn width(&self) -> f64 {
        self.end_x - self.start_x
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }

    /// Boxes removing the cover on either side of the slab, in board space.
    pub fn removal_boxes(&self, dims: &CaseDimensions) -> CutterSet {
        let length = dims.real_case_width;
        let height = dims.case_height_extra_fill * 4.0;
        let y = dims.outline.min_y;
        let depth = dims.outline.height();
        let z = -height / 2.0;

        let mut cutters = Vec::new();
        if !self.is_first() && self.start_x > 0.0 {
            cutters.push(CutterBox {
                side: SeamSide::Left,
                cell: None,
                label: None,
                bounds: Box3::from_origin_size(
                    Point3d::new(dims.board_x(self.start_x) - length, y, z),
                    [length, depth, height],
                ),
            });
        }
        if !self.is_last() && self.end_x < length {
            cutters.push(CutterBox {
                side: SeamSide::Right,
                cell: None,
                label: None,
                bounds: Box3::from_origin_size(
                    Point3d::new(dims.board_x(self.end_x), y, z),
                    [length, depth, height],
                ),
            });
        }
        CutterSet {
            section: self.index,
            cutters,
        }
    }
}

/// Split points of the bottom cover, from 0 to the case width.
///
/// The cover is cut into equal slabs. An interior split that would pass
/// through a screw boss or its wings moves to the nearer side of it.
pub fn slab_boundaries(dims: &CaseDimensions, screws: &[ScrewBoss]) -> Vec<f64> {
    let count = dims.bottom_section_count.max(1);
    let width = dims.real_case_width;
    let size = width / count as f64;

    let mut boundaries = Vec::with_capacity(count + 1);
    boundaries.push(0.0);
    for k in 1..count {
        let mut b = k as f64 * size;
        for span in screws.iter().map(ScrewBoss::x_span) {
            if span.contains_strictly(b) {
                let moved = if b < span.center() { span.min } else { span.max };
                debug!(from = b, to = moved, "split moved off screw boss");
                b = moved;
            }
        }
        let floor = boundaries.last().copied().unwrap_or(0.0);
        boundaries.push(b.clamp(floor, width));
    }
    boundaries.push(width);
    boundaries
}

/// The slab kept for bottom section `index`.
#[instrument(skip(dims, screws))]
pub fn bottom_slab(dims: &CaseDimensions, screws: &[ScrewBoss], index: usize) -> Result<BottomSlab, SeamError> {
    let count = dims.bottom_section_count.max(1);
    if index >= count {
        return Err(SeamError::UnknownSection { index, count });
    }
    let boundaries = slab_boundaries(dims, screws);
    Ok(BottomSlab {
        index,
        count,
        start_x: boundaries[index],
        end_x: boundaries[index + 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ScrewRole;
    use crate::config::Parameters;
    use crate::geometry::{Bounds2d, Point2d};
    use approx::assert_relative_eq;

    fn dims(width_units: f64, build: f64) -> CaseDimensions {
        CaseDimensions::new(
            Bounds2d::new(0.0, width_units, -4.0, 0.0),
            &Parameters::with_build_width(build),
        )
    }

    fn boss(x: f64, radius: f64) -> ScrewBoss {
        ScrewBoss {
            role: ScrewRole::BottomEdge,
            inset_position: Point2d::new(x, 0.0),
            position: Point2d::new(x, 0.0),
            boss_radius: radius,
            wings: Vec::new(),
        }
    }

    #[test]
    fn test_equal_slabs() {
        let d = dims(10.0, 100.0);
        assert_eq!(d.bottom_section_count, 2);
        let b = slab_boundaries(&d, &[]);
        assert_eq!(b.len(), 3);
        assert_relative_eq!(b[1], 95.25);
        assert_relative_eq!(b[2], 190.5);
    }

    #[test]
    fn test_split_moves_off_screw() {
        let d = dims(10.0, 100.0);
        let b = slab_boundaries(&d, &[boss(100.0, 10.0)]);
        assert_relative_eq!(b[1], 90.0);

        let b = slab_boundaries(&d, &[boss(90.0, 10.0)]);
        assert_relative_eq!(b[1], 100.0);
    }

    #[test]
    fn test_single_slab_has_no_cutters() {
        let d = dims(4.0, 200.0);
        let slab = bottom_slab(&d, &[], 0).unwrap();
        assert!(slab.is_first() && slab.is_last());
        assert!(slab.removal_boxes(&d).is_empty());
    }

    #[test]
    fn test_removal_boxes_bracket_slab() {
        let d = dims(15.0, 100.0);
        assert_eq!(d.bottom_section_count, 3);
        let middle = bottom_slab(&d, &[], 1).unwrap();
        let set = middle.removal_boxes(&d);
        assert_eq!(set.len(), 2);

        let left = set.on_side(SeamSide::Left).next().unwrap();
        assert_relative_eq!(left.bounds.max.x, d.board_x(middle.start_x));
        let right = set.on_side(SeamSide::Right).next().unwrap();
        assert_relative_eq!(right.bounds.min.x, d.board_x(middle.end_x));
        assert_relative_eq!(right.bounds.size()[1], d.real_case_height);
        assert_relative_eq!(right.bounds.size()[2], 53.0 * 4.0);

        let first = bottom_slab(&d, &[], 0).unwrap().removal_boxes(&d);
        assert_eq!(first.len(), 1);
        assert_eq!(first.cutters[0].side, SeamSide::Right);
    }

    #[test]
    fn test_unknown_slab() {
        let d = dims(4.0, 200.0);
        assert_eq!(
            bottom_slab(&d, &[], 1).unwrap_err(),
            SeamError::UnknownSection { index: 1, count: 1 }
        );
    }
}
