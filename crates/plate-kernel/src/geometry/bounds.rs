use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};

/// Axis-aligned rectangle in the layout plane.
///
/// `max_y` is the top edge: rows grow downward, so y is negative-going.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2d {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds2d {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }

    /// Enclosing box of a set of points, or `None` when the set is empty.
    pub fn from_points(points: &[Point2d]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bb = Self::new(first.x, first.x, first.y, first.y);
        for p in rest {
            bb.expand_to_include(p);
        }
        Some(bb)
    }

    pub fn expand_to_include(&mut self, p: &Point2d) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Open-interval overlap of the vertical extents.
    pub fn overlaps_y(&self, other: &Self, eps: f64) -> bool {
        other.max_y > self.min_y + eps && other.min_y < self.max_y - eps
    }

    /// Open-interval overlap of the horizontal extents.
    pub fn overlaps_x(&self, other: &Self, eps: f64) -> bool {
        other.max_x > self.min_x + eps && other.min_x < self.max_x - eps
    }

    /// Positive-area intersection.
    pub fn intersects(&self, other: &Self, eps: f64) -> bool {
        self.overlaps_x(other, eps) && self.overlaps_y(other, eps)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.min_x * factor,
            self.max_x * factor,
            self.min_y * factor,
            self.max_y * factor,
        )
    }

    pub fn corners(&self) -> [Point2d; 4] {
        [
            Point2d::new(self.min_x, self.max_y),
            Point2d::new(self.max_x, self.max_y),
            Point2d::new(self.max_x, self.min_y),
            Point2d::new(self.min_x, self.min_y),
        ]
    }
}

/// Axis-aligned box in case space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    pub min: Point3d,
    pub max: Point3d,
}

impl Box3 {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Box from a minimum corner and a size along each axis.
    pub fn from_origin_size(origin: Point3d, size: [f64; 3]) -> Self {
        Self {
            min: origin,
            max: Point3d::new(origin.x + size[0], origin.y + size[1], origin.z + size[2]),
        }
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }

    pub fn volume(&self) -> f64 {
        let [dx, dy, dz] = self.size();
        dx * dy * dz
    }
}
