use serde::{Deserialize, Serialize};

/// One row of a layout description, applied left to right.
pub type LayoutRow = Vec<LayoutEntry>;

/// A single entry inside a layout row.
///
/// Strings are keys; objects carry modifiers for the keys that follow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutEntry {
    Key(String),
    Modifier(KeyModifier),
}

impl LayoutEntry {
    pub fn key(label: impl Into<String>) -> Self {
        Self::Key(label.into())
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }
}

/// Modifier record from a layout editor export.
///
/// Position deltas (`x`, `y`) accumulate across the row. Sizes (`w`, `h`)
/// apply to the next key only. `r`, `rx`, `ry` start a rotated group, and
/// `d` marks the next key as decal (no switch). Editor-only properties such
/// as colours and legends alignment are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyModifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<bool>,
}

impl KeyModifier {
    pub fn width(w: f64) -> Self {
        Self { w: Some(w), ..Self::default() }
    }

    pub fn height(h: f64) -> Self {
        Self { h: Some(h), ..Self::default() }
    }

    pub fn offset(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    pub fn rotation(r: f64, rx: f64, ry: f64) -> Self {
        Self { r: Some(r), rx: Some(rx), ry: Some(ry), ..Self::default() }
    }

    pub fn decal() -> Self {
        Self { d: Some(true), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_modifier_and_keys() {
        let row: LayoutRow = serde_json::from_str(r##"["Esc", {"w": 1.5, "c": "#ccc"}, "Tab"]"##).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row[0], LayoutEntry::key("Esc"));
        assert_eq!(row[1], LayoutEntry::Modifier(KeyModifier::width(1.5)));
        assert!(row[2].is_key());
    }

    #[test]
    fn test_decal_flag() {
        let entry: LayoutEntry = serde_json::from_str(r#"{"d": true, "x": 0.25}"#).unwrap();
        match entry {
            LayoutEntry::Modifier(m) => {
                assert_eq!(m.d, Some(true));
                assert_eq!(m.x, Some(0.25));
                assert_eq!(m.w, None);
            }
            other => panic!("expected modifier, got {other:?}"),
        }
    }

    #[test]
    fn test_modifier_serializes_only_set_fields() {
        let json = serde_json::to_string(&KeyModifier::rotation(15.0, 1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"r":15.0,"rx":1.0,"ry":2.0}"#);
    }
}
