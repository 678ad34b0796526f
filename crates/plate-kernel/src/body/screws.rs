//! Screw boss placement and support wing reach.

use serde::Serialize;
use tracing::{debug, instrument};

use super::CaseDimensions;
use crate::config::Parameters;
use crate::geometry::Point2d;

/// Thickness of one support wing (millimetres).
pub const WING_THICKNESS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WingDirection {
    Right,
    Left,
    Forward,
    Back,
}

/// Where a screw sits on the case outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrewRole {
    BottomLeft,
    TopLeft,
    TopRight,
    BottomRight,
    TopEdge,
    BottomEdge,
    LeftEdge,
    RightEdge,
}

impl ScrewRole {
    /// Wings grown from a screw in this position: corners reach inward on
    /// both axes, edge screws reach along their edge.
    pub fn wings(self) -> &'static [WingDirection] {
        use WingDirection::*;
        match self {
            ScrewRole::BottomLeft => &[Forward, Right],
            ScrewRole::TopLeft => &[Back, Right],
            ScrewRole::TopRight => &[Back, Left],
            ScrewRole::BottomRight => &[Forward, Left],
            ScrewRole::LeftEdge | ScrewRole::RightEdge => &[Forward, Back],
            ScrewRole::TopEdge | ScrewRole::BottomEdge => &[Right, Left],
        }
    }
}

/// Closed horizontal interval (millimetres, case space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub fn contains_strictly(&self, x: f64) -> bool {
        x > self.min && x < self.max
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// One screw hole with its boss and support wings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrewBoss {
    pub role: ScrewRole,
    /// Position inside the inset screw rectangle.
    pub inset_position: Point2d,
    /// Position in case space.
    pub position: Point2d,
    pub boss_radius: f64,
    /// Reach of each wing from the screw centre.
    pub wings: Vec<(WingDirection, f64)>,
}

impl ScrewBoss {
    pub fn wing(&self, direction: WingDirection) -> Option<f64> {
        self.wings.iter().find(|(d, _)| *d == direction).map(|(_, len)| *len)
    }

    /// Horizontal extent of the boss and its wings.
    pub fn x_span(&self) -> Span {
        let half_wing = WING_THICKNESS / 2.0;
        let mut left = self.boss_radius.max(half_wing);
        let mut right = left;
        if let Some(len) = self.wing(WingDirection::Left) {
            left = left.max(len);
        }
        if let Some(len) = self.wing(WingDirection::Right) {
            right = right.max(len);
        }
        Span {
            min: self.position.x - left,
            max: self.position.x + right,
        }
    }
}

/// Place screw bosses around the case.
///
/// Four corner screws come first. Remaining pairs go one at a time to the
/// axis with the wider spacing, mirrored on opposite edges. With a cable
/// hole the top-centre screw is left out.
#[instrument(skip_all, fields(count = params.screw_count))]
pub fn layout_screws(dims: &CaseDimensions, params: &Parameters) -> Vec<ScrewBoss> {
    if params.screw_count < 4 {
        return Vec::new();
    }
    let x_inset = params.screw_x_inset();
    let y_inset = params.screw_y_inset();
    let width = dims.real_case_width - x_inset * 2.0;
    let height = dims.real_case_height - y_inset * 2.0;

    let mut placed: Vec<(ScrewRole, f64, f64)> = vec![
        (ScrewRole::BottomLeft, 0.0, 0.0),
        (ScrewRole::TopLeft, 0.0, height),
        (ScrewRole::TopRight, width, height),
        (ScrewRole::BottomRight, width, 0.0),
    ];

    let (mut nx, mut ny) = (0u32, 0u32);
    for _ in 0..(params.screw_count - 4) / 2 {
        let x_spacing = width / f64::from(nx + 1);
        let y_spacing = height / f64::from(ny + 1);
        if x_spacing >= y_spacing {
            nx += 1;
        } else {
            ny += 1;
        }
    }
    debug!(nx, ny, "edge screws per axis");

    let x_spacing = width / f64::from(nx + 1);
    let y_spacing = height / f64::from(ny + 1);
    for i in 1..=nx {
        let x = f64::from(i) * x_spacing;
        placed.push((ScrewRole::TopEdge, x, height));
        placed.push((ScrewRole::BottomEdge, x, 0.0));
    }
    for i in 1..=ny {
        let y = f64::from(i) * y_spacing;
        placed.push((ScrewRole::LeftEdge, 0.0, y));
        placed.push((ScrewRole::RightEdge, width, y));
    }

    let boss_radius = params.screw_hole_body_radius();
    let wing_length = params.screw_support_length();
    placed
        .into_iter()
        .filter(|&(role, x, _)| {
            let top_centre = role == ScrewRole::TopEdge && (x - width / 2.0).abs() < 1e-9;
            !(params.cable_hole && top_centre)
        })
        .map(|(role, x, y)| ScrewBoss {
            role,
            inset_position: Point2d::new(x, y),
            position: Point2d::new(x + x_inset, y + y_inset),
            boss_radius,
            wings: role.wings().iter().map(|&d| (d, wing_length)).collect(),
        })
        .collect()
}
