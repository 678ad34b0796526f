use serde::{Deserialize, Serialize};

use super::cell::Cell;
use crate::config::Parameters;
use crate::csg::GeometryKernel;
use crate::geometry::{Bounds2d, Box3, Point3d};
use crate::to_physical;

/// Support-bar companion of a switch cell.
///
/// The bar is a hollow rectangle hanging below the plate around the switch
/// footprint. Its matching cutout clears the full footprint to the same depth
/// so neighbouring bars can be re-added without overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Outer outline in board millimetres.
    pub outline: Bounds2d,
    pub plate_thickness: f64,
    pub bar_height: f64,
    pub bar_width: f64,
}

impl Support {
    pub fn for_cell(cell: &Cell, params: &Parameters) -> Self {
        Self {
            outline: cell.footprint().scaled(to_physical(1.0)),
            plate_thickness: params.plate_thickness,
            bar_height: params.support_bar_height,
            bar_width: params.support_bar_width,
        }
    }

    /// Opening inside the bar walls. Each wall is a quarter of the bar width
    /// so two touching supports share one full-width bar.
    pub fn hollow(&self) -> Bounds2d {
        let inset = self.bar_width / 4.0;
        Bounds2d::new(
            self.outline.min_x + inset,
            self.outline.max_x - inset,
            self.outline.min_y + inset,
            self.outline.max_y - inset,
        )
    }

    /// Total depth from the plate top to the bottom of the bars.
    pub fn depth(&self) -> f64 {
        self.bar_height + self.plate_thickness
    }

    /// Solid block spanning the outline, plate and bars included.
    pub fn cutout_box(&self) -> Box3 {
        let top = self.plate_thickness / 2.0;
        Box3::new(
            Point3d::new(self.outline.min_x, self.outline.min_y, top - self.depth()),
            Point3d::new(self.outline.max_x, self.outline.max_y, top),
        )
    }

    /// Build the support through a geometry kernel: the outline block minus the hollow below the plate.
    pub fn build<K: GeometryKernel>(&self, kernel: &mut K) -> K::Solid {
        let outer = kernel.cuboid(&self.cutout_box());
        let hollow = self.hollow();
        let bottom = self.plate_thickness / 2.0 - self.depth();
        let inner = kernel.cuboid(&Box3::new(
            Point3d::new(hollow.min_x, hollow.min_y, bottom - self.bar_height),
            Point3d::new(hollow.max_x, hollow.max_y, -self.plate_thickness / 2.0),
        ));
        kernel.difference(outer, vec![inner])
    }
}
