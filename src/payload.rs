//! State update payload for Hue lights and groups.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::errors::Error;
use crate::names::State;
use crate::types::{Alert, Brightness, Coordinates, Effect, Hue, Mireds, Saturation};

type Result<T> = std::result::Result<T, Error>;

/// A state update to send to a light or group.
///
/// Payloads can contain multiple attributes that will be applied by the
/// bridge in a single request. Attribute names follow this library's naming
/// (`brightness`, `temperature`, ...); they are translated to the bridge's
/// names when sent.
///
/// # Creating Payloads
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use huegely_rs::{Payload, Brightness};
///    let payload = Payload::from(Brightness::clamped(100));
///    ```
///
/// 2. **Builder pattern** for combining multiple attributes:
///    ```
///    use huegely_rs::{Payload, Hue, Saturation};
///    let mut payload = Payload::new();
///    payload.on(true).hue(Hue::wrapped(10000)).saturation(Saturation::clamped(200));
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Clone, PartialEq)]
pub struct Payload {
    pub(crate) on: Option<bool>,
    pub(crate) brightness: Option<Brightness>,
    pub(crate) brighter: Option<Brightness>,
    pub(crate) darker: Option<Brightness>,
    pub(crate) hue: Option<Hue>,
    pub(crate) saturation: Option<Saturation>,
    pub(crate) coordinates: Option<Coordinates>,
    pub(crate) temperature: Option<Mireds>,
    pub(crate) alert: Option<Alert>,
    pub(crate) effect: Option<Effect>,
    #[serde(skip)]
    pub(crate) transition_time: Option<Duration>,
    #[serde(flatten)]
    pub(crate) extra: State,
}

impl Payload {
    /// Create a new empty payload.
    ///
    /// At least one attribute must be set for the payload to be valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Payload;
    ///
    /// let payload = Payload::new();
    /// assert_eq!(payload.is_valid(), false);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this payload changes at least one attribute.
    ///
    /// A transition time alone changes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use huegely_rs::Payload;
    ///
    /// let mut payload = Payload::new();
    /// payload.transition_time(Duration::from_secs(1));
    /// assert_eq!(payload.is_valid(), false);
    ///
    /// payload.on(true);
    /// assert_eq!(payload.is_valid(), true);
    /// ```
    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.brightness.is_some()
            || self.brighter.is_some()
            || self.darker.is_some()
            || self.hue.is_some()
            || self.saturation.is_some()
            || self.coordinates.is_some()
            || self.temperature.is_some()
            || self.alert.is_some()
            || self.effect.is_some()
            || !self.extra.is_empty()
    }

    /// Turn the device on or off.
    pub fn on(&mut self, on: bool) -> &mut Self {
        self.on = Some(on);
        self
    }

    /// Set the brightness level.
    pub fn brightness(&mut self, brightness: Brightness) -> &mut Self {
        self.brightness = Some(brightness);
        self
    }

    /// Increase the brightness by `step`.
    ///
    /// Takes precedence over [`Payload::darker`] when both are set.
    pub fn brighter(&mut self, step: Brightness) -> &mut Self {
        self.brighter = Some(step);
        self
    }

    /// Decrease the brightness by `step`.
    pub fn darker(&mut self, step: Brightness) -> &mut Self {
        self.darker = Some(step);
        self
    }

    pub fn hue(&mut self, hue: Hue) -> &mut Self {
        self.hue = Some(hue);
        self
    }

    pub fn saturation(&mut self, saturation: Saturation) -> &mut Self {
        self.saturation = Some(saturation);
        self
    }

    /// Set the color as CIE xy coordinates.
    pub fn coordinates(&mut self, coordinates: Coordinates) -> &mut Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Set the white color temperature.
    pub fn temperature(&mut self, temperature: Mireds) -> &mut Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn alert(&mut self, alert: Alert) -> &mut Self {
        self.alert = Some(alert);
        self
    }

    pub fn effect(&mut self, effect: Effect) -> &mut Self {
        self.effect = Some(effect);
        self
    }

    /// Animate the change over `duration`.
    ///
    /// Overrides the device's and the bridge's default transition time. The
    /// bridge works in steps of 100ms; the duration is rounded to the nearest
    /// step.
    pub fn transition_time(&mut self, duration: Duration) -> &mut Self {
        self.transition_time = Some(duration);
        self
    }

    /// Set any other attribute, using this library's attribute naming.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Payload;
    ///
    /// let mut payload = Payload::new();
    /// payload.attribute("scene", "AB34EF5");
    /// assert!(payload.is_valid());
    /// ```
    pub fn attribute(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.extra.insert(name.to_string(), value.into());
        self
    }

    /// The state map this payload describes, with transition time excluded.
    pub(crate) fn to_state(&self) -> Result<State> {
        match serde_json::to_value(self).map_err(Error::JsonDump)? {
            Value::Object(state) => Ok(state),
            other => Err(Error::protocol(format!(
                "payload serialized to a non-object: {other}"
            ))),
        }
    }
}

/// Converts a duration to the bridge's transition time unit (100ms steps).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use huegely_rs::transition_steps;
///
/// assert_eq!(transition_steps(Duration::from_millis(400)), 4);
/// assert_eq!(transition_steps(Duration::from_millis(1260)), 13);
/// assert_eq!(transition_steps(Duration::from_millis(1240)), 12);
/// ```
pub fn transition_steps(duration: Duration) -> u16 {
    let steps = (duration.as_millis() as f64 / 100.0).round();
    steps.min(f64::from(u16::MAX)) as u16
}

impl From<Brightness> for Payload {
    fn from(brightness: Brightness) -> Self {
        let mut p = Payload::new();
        p.brightness(brightness);
        p
    }
}

impl From<Hue> for Payload {
    fn from(hue: Hue) -> Self {
        let mut p = Payload::new();
        p.hue(hue);
        p
    }
}

impl From<Coordinates> for Payload {
    fn from(coordinates: Coordinates) -> Self {
        let mut p = Payload::new();
        p.coordinates(coordinates);
        p
    }
}

impl From<Mireds> for Payload {
    fn from(temperature: Mireds) -> Self {
        let mut p = Payload::new();
        p.temperature(temperature);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_uses_semantic_names() {
        let mut payload = Payload::new();
        payload
            .on(true)
            .brightness(Brightness::clamped(200))
            .coordinates(Coordinates::clamped(0.25, 0.5))
            .alert(Alert::Select)
            .transition_time(Duration::from_secs(2));

        let state = payload.to_state().unwrap();
        assert_eq!(
            Value::Object(state),
            json!({
                "on": true,
                "brightness": 200,
                "coordinates": [0.25, 0.5],
                "alert": "select",
            })
        );
    }

    #[test]
    fn test_extra_attributes_are_flattened() {
        let mut payload = Payload::new();
        payload.effect(Effect::Colorloop).attribute("scene", "abc");

        let state = payload.to_state().unwrap();
        assert_eq!(state.get("scene"), Some(&json!("abc")));
        assert_eq!(state.get("effect"), Some(&json!("colorloop")));
    }

    #[test]
    fn test_transition_steps_saturate() {
        assert_eq!(transition_steps(Duration::from_secs(100_000)), u16::MAX);
        assert_eq!(transition_steps(Duration::ZERO), 0);
    }
}
