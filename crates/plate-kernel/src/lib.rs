pub mod geometry;
pub mod layout;
pub mod adjacency;
pub mod partition;
pub mod seam;
pub mod body;
pub mod config;
pub mod validation;
pub mod csg;
pub mod board;

// Re-export the pipeline types at crate root for convenience.
pub use adjacency::{AdjacencyResolver, AdjacencyTable, Direction, Scope};
pub use board::Board;
pub use config::{ConfigError, Parameters};
pub use csg::{CsgNode, CsgTree, GeometryKernel};
pub use layout::{Cell, CellId, LayoutError, LayoutGrid};
pub use partition::{Partition, Section};
pub use seam::{CutterBox, CutterSet, SeamRemover};

/// Physical distance between adjacent key centres (millimetres per layout unit).
pub const KEY_PITCH: f64 = 19.05;

/// Convert a layout-unit length to millimetres.
pub fn to_physical(units: f64) -> f64 {
    units * KEY_PITCH
}

/// Global tolerance configuration for layout comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Edges closer than this are considered touching (layout units).
    pub coincidence: f64,
    /// Grid key quantum: coordinates are rounded to this step before being used as map keys.
    pub key_quantum: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            key_quantum: 1e-6,
        }
    }
}

impl Tolerance {
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.coincidence
    }

    pub fn quantize(&self, value: f64) -> i64 {
        (value / self.key_quantum).round() as i64
    }
}
