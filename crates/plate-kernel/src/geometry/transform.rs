use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use super::point::Point2d;

/// Rotation of the layout plane about a pivot point.
///
/// Angles are in degrees. Positive angles turn clockwise, matching how
/// layout editors rotate key groups on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotRotation {
    pub degrees: f64,
    pub pivot: Point2d,
}

impl Default for PivotRotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl PivotRotation {
    pub fn new(degrees: f64, pivot: Point2d) -> Self {
        Self { degrees, pivot }
    }

    pub fn identity() -> Self {
        Self {
            degrees: 0.0,
            pivot: Point2d::ORIGIN,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.degrees == 0.0
    }

    pub fn inverse(&self) -> Self {
        Self {
            degrees: -self.degrees,
            pivot: self.pivot,
        }
    }

    /// Rotate a point given relative to the pivot and return its board position.
    pub fn place(&self, local: Point2d) -> Point2d {
        self.pivot + self.rotate_vector(local)
    }

    /// Rotate a board point about the pivot.
    pub fn apply(&self, p: Point2d) -> Point2d {
        self.place(p - self.pivot)
    }

    fn rotate_vector(&self, v: Point2d) -> Point2d {
        if self.is_identity() {
            return v;
        }
        let rot = Rotation2::new(-self.degrees.to_radians());
        let out = rot * Vector2::new(v.x, v.y);
        Point2d::new(out.x, out.y)
    }
}
