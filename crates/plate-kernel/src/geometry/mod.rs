pub mod bounds;
pub mod point;
pub mod transform;

pub use bounds::{Bounds2d, Box3};
pub use point::{Point2d, Point3d};
pub use transform::PivotRotation;
