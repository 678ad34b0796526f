use serde::{Deserialize, Serialize};

/// Switch family whose cutout outline the plate uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchType {
    #[default]
    MxOpenable,
    Mx,
    MxAlps,
    Alps,
}

/// Stabilizer family for keys two units or wider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizerType {
    CherryCostar,
    #[default]
    Cherry,
    Costar,
    Alps,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_type_names() {
        let t: SwitchType = serde_json::from_str(r#""mx_alps""#).unwrap();
        assert_eq!(t, SwitchType::MxAlps);
        assert!(serde_json::from_str::<SwitchType>(r#""topre""#).is_err());
    }

    #[test]
    fn test_stabilizer_default_is_cherry() {
        assert_eq!(StabilizerType::default(), StabilizerType::Cherry);
        let t: StabilizerType = serde_json::from_str(r#""cherry_costar""#).unwrap();
        assert_eq!(t, StabilizerType::CherryCostar);
    }
}
