//! Typed generator parameters.

use keyplate_types::{StabilizerType, SwitchType};
use serde::{Deserialize, Serialize};

/// Height added above the case when building fill blocks (millimetres).
pub const CASE_HEIGHT_EXTRA: f64 = 50.0;

/// Errors from parameter validation and lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("screw count must be at least 4, got {0}")]
    TooFewScrews(u32),

    #[error("screw count must be even, got {0}")]
    OddScrewCount(u32),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("no parameter exists with name {0}")]
    UnknownParameter(String),
}

/// A named parameter value returned by [`Parameters::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Flag(bool),
}

/// Every recognised generator option with its default.
///
/// Lengths are millimetres. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    /// Printable envelope.
    pub x_build_size: f64,
    pub y_build_size: f64,
    /// Per-edge cutout compensation.
    pub kerf: f64,

    pub switch_type: SwitchType,
    pub stabilizer_type: StabilizerType,

    pub plate_supports: bool,
    pub support_bar_height: f64,
    pub support_bar_width: f64,

    pub top_margin: f64,
    pub bottom_margin: f64,
    pub left_margin: f64,
    pub right_margin: f64,

    pub case_height: f64,
    #[serde(alias = "plate_wall_thickness")]
    pub case_wall_thickness: f64,
    pub plate_thickness: f64,
    pub plate_corner_radius: f64,
    pub bottom_cover_thickness: f64,
    /// Degrees about the x axis.
    pub tilt: f64,

    pub screw_count: u32,
    pub screw_diameter: f64,
    pub screw_edge_inset: f64,
    pub screw_edge_x_inset: Option<f64>,
    pub screw_edge_y_inset: Option<f64>,
    pub screw_hole_body_wall_width: f64,
    pub screw_hole_body_support_x_factor: f64,

    pub cable_hole: bool,
    pub cable_hole_width: f64,
    pub cable_hole_height: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            x_build_size: 200.0,
            y_build_size: 200.0,
            kerf: 0.0,
            switch_type: SwitchType::default(),
            stabilizer_type: StabilizerType::default(),
            plate_supports: true,
            support_bar_height: 3.0,
            support_bar_width: 1.0,
            top_margin: 0.0,
            bottom_margin: 0.0,
            left_margin: 0.0,
            right_margin: 0.0,
            case_height: 3.0,
            case_wall_thickness: 0.0,
            plate_thickness: 1.111,
            plate_corner_radius: 0.0,
            bottom_cover_thickness: 1.0,
            tilt: 0.0,
            screw_count: 0,
            screw_diameter: 0.0,
            screw_edge_inset: 0.0,
            screw_edge_x_inset: None,
            screw_edge_y_inset: None,
            screw_hole_body_wall_width: 2.0,
            screw_hole_body_support_x_factor: 4.0,
            cable_hole: false,
            cable_hole_width: 10.0,
            cable_hole_height: 10.0,
        }
    }
}

impl Parameters {
    /// Parameters with a specific printable envelope width.
    pub fn with_build_width(x_build_size: f64) -> Self {
        Self {
            x_build_size,
            ..Self::default()
        }
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screw_count > 0 {
            if self.screw_count < 4 {
                return Err(ConfigError::TooFewScrews(self.screw_count));
            }
            if self.screw_count % 2 != 0 {
                return Err(ConfigError::OddScrewCount(self.screw_count));
            }
        }
        for (name, value) in [("x_build_size", self.x_build_size), ("y_build_size", self.y_build_size)] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        for (name, value) in [
            ("kerf", self.kerf),
            ("top_margin", self.top_margin),
            ("bottom_margin", self.bottom_margin),
            ("left_margin", self.left_margin),
            ("right_margin", self.right_margin),
            ("screw_diameter", self.screw_diameter),
            ("screw_edge_inset", self.screw_edge_inset),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if !(self.screw_hole_body_support_x_factor > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "screw_hole_body_support_x_factor",
                value: self.screw_hole_body_support_x_factor,
            });
        }
        Ok(())
    }

    /// Look up a scalar parameter by its file key.
    pub fn lookup(&self, name: &str) -> Result<ParamValue, ConfigError> {
        use ParamValue::{Flag, Number};
        let value = match name {
            "x_build_size" => Number(self.x_build_size),
            "y_build_size" => Number(self.y_build_size),
            "kerf" => Number(self.kerf),
            "plate_supports" => Flag(self.plate_supports),
            "support_bar_height" => Number(self.support_bar_height),
            "support_bar_width" => Number(self.support_bar_width),
            "top_margin" => Number(self.top_margin),
            "bottom_margin" => Number(self.bottom_margin),
            "left_margin" => Number(self.left_margin),
            "right_margin" => Number(self.right_margin),
            "case_height" => Number(self.case_height),
            "case_wall_thickness" | "plate_wall_thickness" => Number(self.case_wall_thickness),
            "plate_thickness" => Number(self.plate_thickness),
            "plate_corner_radius" => Number(self.plate_corner_radius),
            "bottom_cover_thickness" => Number(self.bottom_cover_thickness),
            "tilt" => Number(self.tilt),
            "screw_count" => Number(f64::from(self.screw_count)),
            "screw_diameter" => Number(self.screw_diameter),
            "screw_edge_inset" => Number(self.screw_edge_inset),
            "screw_edge_x_inset" => Number(self.screw_x_inset()),
            "screw_edge_y_inset" => Number(self.screw_y_inset()),
            "screw_hole_body_wall_width" => Number(self.screw_hole_body_wall_width),
            "screw_hole_body_support_x_factor" => Number(self.screw_hole_body_support_x_factor),
            "cable_hole" => Flag(self.cable_hole),
            "cable_hole_width" => Number(self.cable_hole_width),
            "cable_hole_height" => Number(self.cable_hole_height),
            _ => return Err(ConfigError::UnknownParameter(name.to_string())),
        };
        Ok(value)
    }

    pub fn screw_x_inset(&self) -> f64 {
        self.screw_edge_x_inset.unwrap_or(self.screw_edge_inset)
    }

    pub fn screw_y_inset(&self) -> f64 {
        self.screw_edge_y_inset.unwrap_or(self.screw_edge_inset)
    }

    /// Case height above the bottom cover.
    pub fn case_height_base_removed(&self) -> f64 {
        self.case_height - self.bottom_cover_thickness
    }

    /// Height of the fill blocks that reach below the case.
    pub fn case_height_extra_fill(&self) -> f64 {
        self.case_height + CASE_HEIGHT_EXTRA
    }

    pub fn screw_hole_body_radius(&self) -> f64 {
        (self.screw_diameter + self.screw_hole_body_wall_width * 2.0) / 2.0
    }

    /// Reach of one screw-boss support wing from the screw centre.
    pub fn screw_support_length(&self) -> f64 {
        self.case_height_extra_fill() / self.screw_hole_body_support_x_factor + self.screw_hole_body_radius()
    }
}
