use serde::{Deserialize, Serialize};

use super::LayoutError;
use crate::geometry::{Bounds2d, PivotRotation, Point2d};

/// One rectangular key position in layout units.
///
/// `x`/`y` is the top-left corner. For a rotated cell they are relative to
/// the rotation pivot; otherwise they are board coordinates. Rows grow
/// downward, so `y` is zero or negative for a normal layout.
///
/// The footprint is fixed at construction. Neighbor information lives in
/// [`AdjacencyTable`](crate::adjacency::AdjacencyTable), not on the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    rotation: PivotRotation,
    label: String,
    kerf: f64,
}

impl Cell {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Result<Self, LayoutError> {
        for (field, v) in [("x", x), ("y", y), ("w", w), ("h", h)] {
            if !v.is_finite() {
                return Err(LayoutError::NonFiniteCoordinate { field });
            }
        }
        if w <= 0.0 || h <= 0.0 {
            return Err(LayoutError::InvalidCellSize { w, h });
        }
        Ok(Self {
            x,
            y,
            w,
            h,
            rotation: PivotRotation::identity(),
            label: String::new(),
            kerf: 0.0,
        })
    }

    /// Place this cell in a rotated group.
    ///
    /// A zero angle keeps the cell in board coordinates and drops the pivot.
    pub fn rotated(mut self, degrees: f64, pivot: Point2d) -> Result<Self, LayoutError> {
        if !degrees.is_finite() {
            return Err(LayoutError::NonFiniteCoordinate { field: "rotation" });
        }
        if !pivot.is_finite() {
            return Err(LayoutError::NonFiniteCoordinate { field: "pivot" });
        }
        self.rotation = if degrees == 0.0 {
            PivotRotation::identity()
        } else {
            PivotRotation::new(degrees, pivot)
        };
        Ok(self)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn rotation(&self) -> f64 {
        self.rotation.degrees
    }

    pub fn pivot(&self) -> Point2d {
        self.rotation.pivot
    }

    pub fn pivot_rotation(&self) -> &PivotRotation {
        &self.rotation
    }

    pub fn is_rotated(&self) -> bool {
        !self.rotation.is_identity()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kerf(&self) -> f64 {
        self.kerf
    }

    /// Unrotated extent in the cell's own frame: `(x, x+w, y-h, y)`.
    pub fn local_bounds(&self) -> Bounds2d {
        Bounds2d::new(self.x, self.x + self.w, self.y - self.h, self.y)
    }

    /// The four corners in board coordinates, clockwise from top-left.
    pub fn corners(&self) -> [Point2d; 4] {
        self.local_bounds().corners().map(|c| self.rotation.place(c))
    }

    /// Axis-aligned bounding box in board coordinates.
    ///
    /// Equal to [`local_bounds`](Self::local_bounds) for an unrotated cell;
    /// otherwise the box enclosing the four rotated corners.
    pub fn bounding_box(&self) -> Bounds2d {
        if !self.is_rotated() {
            return self.local_bounds();
        }
        let [a, b, c, d] = self.corners();
        let mut bb = Bounds2d::new(a.x, a.x, a.y, a.y);
        for p in [b, c, d] {
            bb.expand_to_include(&p);
        }
        bb
    }

    /// The axis-aligned area used for adjacency and partitioning.
    pub fn footprint(&self) -> Bounds2d {
        self.bounding_box()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' x:{} y:{} w:{} h:{}", self.label, self.x, self.y, self.w, self.h)?;
        if self.is_rotated() {
            write!(
                f,
                " r:{} pivot:({}, {})",
                self.rotation.degrees, self.rotation.pivot.x, self.rotation.pivot.y
            )?;
        }
        Ok(())
    }
}
