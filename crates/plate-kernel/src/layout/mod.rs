pub mod builder;
pub mod cell;
pub mod grid;
pub mod support;

pub use builder::build_grid;
pub use cell::Cell;
pub use grid::{CellId, Column, GridKey, LayoutGrid};
pub use support::Support;

/// Errors raised while constructing cells or grids.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("cell size must be positive, got {w} x {h}")]
    InvalidCellSize { w: f64, h: f64 },

    #[error("cell {field} is not a finite number")]
    NonFiniteCoordinate { field: &'static str },

    #[error("layout contains no keys")]
    EmptyLayout,
}
