//! Alert and effect modes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Alert modes a light or group can be set to.
///
/// The bridge may report other alert values (e.g. `lselect`), but only these
/// two can be set.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alert {
    /// Stop alerting
    None,
    /// Blink once
    Select,
}

/// Dynamic effects a color capable light or group can run.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    /// No effect
    None,
    /// Cycle through all hues at the current brightness and saturation
    Colorloop,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parse_alert() {
        assert_eq!(Alert::from_str("select"), Ok(Alert::Select));
        assert_eq!(Alert::from_str("none"), Ok(Alert::None));
        assert!(Alert::from_str("blink").is_err());
        assert!(Alert::from_str("lselect").is_err());
    }

    #[test]
    fn test_parse_effect() {
        assert_eq!(Effect::from_str("colorloop"), Ok(Effect::Colorloop));
        assert!(Effect::from_str("invalid").is_err());
    }

    #[test]
    fn test_wire_names() {
        let alerts: Vec<String> = Alert::iter().map(|a| a.to_string()).collect();
        assert_eq!(alerts, ["none", "select"]);
        assert_eq!(Effect::Colorloop.as_ref(), "colorloop");
    }
}
