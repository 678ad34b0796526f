pub mod screws;

pub use screws::{ScrewBoss, ScrewRole, Span, WingDirection, layout_screws};

use serde::Serialize;

use crate::config::Parameters;
use crate::geometry::Bounds2d;
use crate::to_physical;

/// Number of equal-width slabs the case bottom is split into.
///
/// Always at least one; a non-positive envelope yields one slab.
pub fn bottom_section_count(case_width: f64, x_build_size: f64) -> usize {
    if !(x_build_size > 0.0) || !(case_width > 0.0) {
        return 1;
    }
    ((case_width / x_build_size).ceil() as usize).max(1)
}

/// Physical case extents derived from the board bounds.
///
/// Board space is millimetres with the first row's top edge at y = 0 and
/// rows going negative. Case space puts the bottom-left case corner at the
/// origin with y going positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaseDimensions {
    /// Board bounds in layout units.
    pub board: Bounds2d,
    /// Case outline in board space, margins included.
    pub outline: Bounds2d,
    /// Key area width (millimetres).
    pub real_max_x: f64,
    /// Key area depth (millimetres).
    pub real_max_y: f64,
    pub real_case_width: f64,
    pub real_case_height: f64,
    pub case_height_base_removed: f64,
    pub case_height_extra_fill: f64,
    pub bottom_section_count: usize,
}

impl CaseDimensions {
    pub fn new(board: Bounds2d, params: &Parameters) -> Self {
        let key_area = Bounds2d::new(
            to_physical(board.min_x.min(0.0)),
            to_physical(board.max_x),
            to_physical(board.min_y),
            to_physical(board.max_y.max(0.0)),
        );
        let outline = Bounds2d::new(
            key_area.min_x - params.left_margin,
            key_area.max_x + params.right_margin,
            key_area.min_y - params.bottom_margin,
            key_area.max_y + params.top_margin,
        );
        Self {
            board,
            outline,
            real_max_x: key_area.width(),
            real_max_y: key_area.height(),
            real_case_width: outline.width(),
            real_case_height: outline.height(),
            case_height_base_removed: params.case_height_base_removed(),
            case_height_extra_fill: params.case_height_extra_fill(),
            bottom_section_count: bottom_section_count(outline.width(), params.x_build_size),
        }
    }

    /// Case-space x of a board-space x.
    pub fn case_x(&self, board_x: f64) -> f64 {
        board_x - self.outline.min_x
    }

    /// Board-space x of a case-space x.
    pub fn board_x(&self, case_x: f64) -> f64 {
        case_x + self.outline.min_x
    }

    /// Case-space y of a board-space y.
    pub fn case_y(&self, board_y: f64) -> f64 {
        board_y - self.outline.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bottom_section_count() {
        assert_eq!(bottom_section_count(250.0, 200.0), 2);
        assert_eq!(bottom_section_count(200.0, 200.0), 1);
        assert_eq!(bottom_section_count(400.1, 200.0), 3);
        assert_eq!(bottom_section_count(10.0, 0.0), 1);
    }

    #[test]
    fn test_dimensions_from_bounds() {
        let params = Parameters {
            left_margin: 5.0,
            right_margin: 7.0,
            top_margin: 3.0,
            bottom_margin: 4.0,
            ..Parameters::default()
        };
        let dims = CaseDimensions::new(Bounds2d::new(0.0, 10.0, -4.0, 0.0), &params);
        assert_relative_eq!(dims.real_max_x, 190.5);
        assert_relative_eq!(dims.real_max_y, 76.2);
        assert_relative_eq!(dims.real_case_width, 202.5);
        assert_relative_eq!(dims.real_case_height, 83.2);
        assert_eq!(dims.bottom_section_count, 2);
        assert_relative_eq!(dims.case_x(0.0), 5.0);
        assert_relative_eq!(dims.board_x(dims.case_x(42.0)), 42.0);
        assert_relative_eq!(dims.case_y(0.0), 80.2);
        assert_relative_eq!(dims.outline.max_y, 3.0);
    }
}
