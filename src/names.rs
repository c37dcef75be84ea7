//! Attribute name mapping between this library and the bridge API.
//!
//! The bridge uses terse attribute names (`bri`, `ct`, `xy`, ...). Every state
//! map that crosses the public API uses the longer semantic names instead;
//! [`to_wire`] and [`to_semantic`] translate in each direction.

use serde_json::{Map, Value};

/// A device state map keyed by attribute name.
pub type State = Map<String, Value>;

/// Semantic name, wire name.
const ATTRIBUTE_NAMES: [(&str, &str); 8] = [
    ("brightness", "bri"),
    ("saturation", "sat"),
    ("temperature", "ct"),
    ("is_reachable", "reachable"),
    ("coordinates", "xy"),
    ("color_mode", "colormode"),
    ("transition_time", "transitiontime"),
    ("last_updated", "lastupdated"),
];

/// Returns the bridge's name for a semantic attribute name.
///
/// # Examples
///
/// ```
/// use huegely_rs::wire_name;
///
/// assert_eq!(wire_name("brightness"), "bri");
/// assert_eq!(wire_name("on"), "on");
/// ```
pub fn wire_name(name: &str) -> &str {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(semantic, _)| *semantic == name)
        .map_or(name, |(_, wire)| *wire)
}

/// Returns the semantic name for an attribute name used by the bridge.
///
/// # Examples
///
/// ```
/// use huegely_rs::semantic_name;
///
/// assert_eq!(semantic_name("ct"), "temperature");
/// assert_eq!(semantic_name("hue"), "hue");
/// ```
pub fn semantic_name(name: &str) -> &str {
    ATTRIBUTE_NAMES
        .iter()
        .find(|(_, wire)| *wire == name)
        .map_or(name, |(semantic, _)| *semantic)
}

/// Renames the keys of a semantic state map to the bridge's names.
pub fn to_wire(state: State) -> State {
    state
        .into_iter()
        .map(|(key, value)| (wire_name(&key).to_string(), value))
        .collect()
}

/// Renames the keys of a state map reported by the bridge to semantic names.
pub fn to_semantic(state: State) -> State {
    state
        .into_iter()
        .map(|(key, value)| (semantic_name(&key).to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> State {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_to_wire() {
        let wire = to_wire(state(json!({"brightness": 200, "on": true, "coordinates": [0.1, 0.2]})));
        assert_eq!(wire, state(json!({"bri": 200, "on": true, "xy": [0.1, 0.2]})));
    }

    #[test]
    fn test_to_semantic() {
        let semantic = to_semantic(state(json!({"colormode": "hs", "reachable": true, "hue": 100})));
        assert_eq!(
            semantic,
            state(json!({"color_mode": "hs", "is_reachable": true, "hue": 100}))
        );
    }

    #[test]
    fn test_known_names_survive_both_directions() {
        let original = state(json!({
            "brightness": 1,
            "saturation": 2,
            "temperature": 3,
            "is_reachable": false,
            "coordinates": [0.5, 0.5],
            "color_mode": "xy",
            "transition_time": 4,
            "last_updated": "2017-08-27T18:22:21",
            "on": true,
            "hue": 5,
        }));
        assert_eq!(to_semantic(to_wire(original.clone())), original);
    }
}
