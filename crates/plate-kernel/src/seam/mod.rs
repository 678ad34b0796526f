//! Cutter volumes that free a section's seams for printing.

pub mod bottom;
pub mod top;

pub use bottom::{BottomSlab, bottom_slab, slab_boundaries};
pub use top::top_cutters;

use serde::Serialize;

use crate::body::{CaseDimensions, ScrewBoss};
use crate::config::Parameters;
use crate::csg::GeometryKernel;
use crate::geometry::Box3;
use crate::layout::{CellId, LayoutGrid};
use crate::partition::Partition;

/// Which side of the kept material a cutter removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeamSide {
    Right,
    Left,
}

/// One axis-aligned removal box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutterBox {
    pub side: SeamSide,
    /// Cell whose row band the box covers, when it comes from a cell.
    #[serde(skip)]
    pub cell: Option<CellId>,
    pub label: Option<String>,
    pub bounds: Box3,
}

/// All cutters for one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutterSet {
    pub section: usize,
    pub cutters: Vec<CutterBox>,
}

impl CutterSet {
    pub fn len(&self) -> usize {
        self.cutters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cutters.is_empty()
    }

    pub fn on_side(&self, side: SeamSide) -> impl Iterator<Item = &CutterBox> + '_ {
        self.cutters.iter().filter(move |c| c.side == side)
    }

    /// Remove every cutter from `solid` with a single Boolean difference.
    pub fn subtract_from<K: GeometryKernel>(&self, kernel: &mut K, solid: K::Solid) -> K::Solid {
        if self.cutters.is_empty() {
            return solid;
        }
        let tools = self.cutters.iter().map(|c| kernel.cuboid(&c.bounds)).collect();
        kernel.difference(solid, tools)
    }
}

/// Errors from cutter synthesis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeamError {
    #[error("section {index} does not exist (board has {count})")]
    UnknownSection { index: usize, count: usize },

    #[error("section {index} has no cells")]
    EmptySection { index: usize },
}

/// Read-only view over a partitioned board that produces seam cutters.
///
/// Every method is a pure function of the inputs, so asking for the same
/// section twice yields identical cutters.
pub struct SeamRemover<'a> {
    grid: &'a LayoutGrid,
    partition: &'a Partition,
    dims: &'a CaseDimensions,
    params: &'a Parameters,
    screws: &'a [ScrewBoss],
}

impl<'a> SeamRemover<'a> {
    pub fn new(
        grid: &'a LayoutGrid,
        partition: &'a Partition,
        dims: &'a CaseDimensions,
        params: &'a Parameters,
        screws: &'a [ScrewBoss],
    ) -> Self {
        Self {
            grid,
            partition,
            dims,
            params,
            screws,
        }
    }

    /// Cutters that open the top side of `section` along its seams.
    pub fn top_cutters(&self, section: usize) -> Result<CutterSet, SeamError> {
        top_cutters(self.grid, self.partition, self.dims, self.params, section)
    }

    /// The bottom-cover slab kept for `section`.
    pub fn bottom_slab(&self, section: usize) -> Result<BottomSlab, SeamError> {
        bottom_slab(self.dims, self.screws, section)
    }

    /// Boxes removing the bottom cover outside `section`'s slab.
    pub fn bottom_cutters(&self, section: usize) -> Result<CutterSet, SeamError> {
        Ok(self.bottom_slab(section)?.removal_boxes(self.dims))
    }
}
