//! Capabilities shared by lights and groups.
//!
//! Every light and group can be dimmed; color and white temperature control
//! are added per device type. The capabilities are traits so that code can be
//! generic over anything dimmable, e.g. `async fn fade<D: Dimmer>(d: &mut D)`.
//!
//! Brightness is in `0..=254`, hue in `0..65535`, saturation in `0..=254` and
//! white temperature in mireds (`154..=500`). Values outside these ranges are
//! clamped (hue wraps around). Every setter returns the value confirmed by the
//! bridge, which may differ from the requested one.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, warn};
use serde_json::{Value, json};

use crate::device::DeviceCore;
use crate::errors::Error;
use crate::names::State;
use crate::payload::{Payload, transition_steps};
use crate::types::{Alert, Brightness, Coordinates, Effect, Hue, Mireds, Saturation};

type Result<T> = std::result::Result<T, Error>;

/// Attribute the bridge uses for relative brightness changes.
const BRIGHTNESS_STEP: &str = "bri_inc";

/// Devices that can be switched and dimmed.
pub trait Dimmer {
    /// Reads the full device state, with semantic attribute names.
    fn state(&mut self) -> impl Future<Output = Result<State>> + Send;

    /// Applies a payload in a single request and returns the confirmed
    /// attributes.
    ///
    /// Relative brightness changes are reported back as `brightness`. A
    /// payload that sets nothing fails with [`Error::NoAttribute`] without a
    /// request.
    fn set_state(&mut self, payload: &Payload) -> impl Future<Output = Result<State>> + Send;

    /// Default transition time for this device. `None` defers to the bridge.
    fn transition_time(&self) -> Option<Duration>;

    fn set_transition_time(&mut self, transition_time: Option<Duration>);

    /// Turns the device on. Returns the confirmed on state.
    fn on(&mut self, transition_time: Option<Duration>) -> impl Future<Output = Result<bool>> + Send;

    /// Turns the device off. Returns the confirmed on state.
    fn off(&mut self, transition_time: Option<Duration>) -> impl Future<Output = Result<bool>> + Send;

    fn is_on(&mut self) -> impl Future<Output = Result<bool>> + Send;

    /// Raises the brightness by `step`, turning the device on if it was off.
    fn brighter(
        &mut self,
        step: i32,
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<u8>> + Send;

    /// Lowers the brightness by `step`. Reaching zero turns the device off;
    /// a device that is already off reports zero.
    fn darker(
        &mut self,
        step: i32,
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<u8>> + Send;

    fn brightness(&mut self) -> impl Future<Output = Result<u8>> + Send;

    /// Sets the brightness. Zero turns the device off, anything else on.
    fn set_brightness(
        &mut self,
        brightness: i32,
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<u8>> + Send;

    fn alert(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Sets the alert mode, `"none"` or `"select"`.
    fn set_alert(&mut self, alert: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Devices with full color control.
pub trait ColorController {
    /// CIE xy color coordinates.
    fn coordinates(&mut self) -> impl Future<Output = Result<[f64; 2]>> + Send;

    fn set_coordinates(
        &mut self,
        coordinates: [f64; 2],
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<[f64; 2]>> + Send;

    fn hue(&mut self) -> impl Future<Output = Result<u16>> + Send;

    fn set_hue(
        &mut self,
        hue: i64,
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<u16>> + Send;

    fn saturation(&mut self) -> impl Future<Output = Result<u8>> + Send;

    fn set_saturation(
        &mut self,
        saturation: i32,
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<u8>> + Send;

    fn effect(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Sets the effect, `"none"` or `"colorloop"`.
    fn set_effect(&mut self, effect: &str) -> impl Future<Output = Result<String>> + Send;

    /// Which color representation is active: `hs`, `xy` or `ct`.
    fn color_mode(&mut self) -> impl Future<Output = Result<String>> + Send;
}

/// Devices with white color temperature control.
pub trait TemperatureController {
    /// White temperature in mireds.
    fn temperature(&mut self) -> impl Future<Output = Result<u16>> + Send;

    fn set_temperature(
        &mut self,
        temperature: i32,
        transition_time: Option<Duration>,
    ) -> impl Future<Output = Result<u16>> + Send;
}

/// Turns `brighter`/`darker` into the bridge's signed step. `brighter` wins.
fn apply_brightness_step(state: &mut State) {
    let brighter = state.remove("brighter").and_then(|v| v.as_i64());
    let darker = state.remove("darker").and_then(|v| v.as_i64()).map(|step| -step);
    if let Some(step) = brighter.or(darker) {
        state.insert(BRIGHTNESS_STEP.to_string(), json!(step));
    }
}

fn with_transition(payload: &mut Payload, transition_time: Option<Duration>) -> &mut Payload {
    if let Some(duration) = transition_time {
        payload.transition_time(duration);
    }
    payload
}

impl DeviceCore {
    pub(crate) async fn set_state(&mut self, payload: &Payload) -> Result<State> {
        if !payload.is_valid() {
            return Err(Error::NoAttribute);
        }

        let mut state = payload.to_state()?;
        apply_brightness_step(&mut state);

        let transition = self.effective_transition(payload.transition_time).await;
        if let Some(duration) = transition {
            state.insert(
                "transition_time".to_string(),
                json!(transition_steps(duration)),
            );
        }
        self.restore_brightness(&mut state, transition.is_some())
            .await?;

        let mut changes = self.write_state(state).await?;

        // Relative changes confirm the step, not the resulting brightness.
        if changes.remove(BRIGHTNESS_STEP).is_some() {
            let brightness: Value = self.read_attribute("brightness").await?;
            changes.insert("brightness".to_string(), brightness);
        }
        Ok(changes)
    }

    /// Works around the bridge forgetting the brightness when a device is
    /// turned off with a transition: it comes back on at the lowest level.
    ///
    /// The brightness before such an "off" is remembered and sent along
    /// with the next "on", unless that already sets a brightness.
    async fn restore_brightness(&mut self, state: &mut State, uses_transition: bool) -> Result<()> {
        let on = state.get("on").and_then(Value::as_bool);
        let brightness = state.get("brightness").and_then(Value::as_u64);
        let turns_off = on == Some(false) || brightness == Some(0);
        let turns_on = !turns_off && (on == Some(true) || brightness.is_some());

        if uses_transition && turns_off {
            let current: u8 = self.read_attribute("brightness").await?;
            // Already dimmed out, e.g. by `darker`.
            if current > 0 {
                debug!("{}: remembering brightness {current}", self.device);
                self.reset_brightness = Some(current);
            }
            return Ok(());
        }

        if let Some(reset) = self.reset_brightness {
            if turns_on && !self.is_on().await? {
                self.reset_brightness = None;
                if brightness.is_none() {
                    debug!("{}: restoring brightness {reset}", self.device);
                    state.insert("brightness".to_string(), json!(reset));
                }
            }
        }
        Ok(())
    }

    pub(crate) async fn switch(&mut self, on: bool, transition_time: Option<Duration>) -> Result<bool> {
        let mut payload = Payload::new();
        with_transition(payload.on(on), transition_time);
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "on")
    }

    pub(crate) async fn is_on(&mut self) -> Result<bool> {
        self.read_attribute("on").await
    }

    pub(crate) async fn brighter(&mut self, step: i32, transition_time: Option<Duration>) -> Result<u8> {
        let mut payload = Payload::new();
        with_transition(payload.brighter(Brightness::clamped(step)), transition_time);

        let changes = match self.set_state(&payload).await {
            Err(e) if e.is_cannot_modify_while_off() => {
                debug!("{}: off, turning on to brighten", self.device);
                payload.on(true);
                self.set_state(&payload).await?
            }
            result => result?,
        };
        self.attribute(&changes, "brightness")
    }

    pub(crate) async fn darker(&mut self, step: i32, transition_time: Option<Duration>) -> Result<u8> {
        let mut payload = Payload::new();
        with_transition(payload.darker(Brightness::clamped(step)), transition_time);

        let changes = match self.set_state(&payload).await {
            Err(e) if e.is_cannot_modify_while_off() => {
                warn!("{}: cannot dim a device that is off", self.device);
                return Ok(0);
            }
            result => result?,
        };

        let brightness: u8 = self.attribute(&changes, "brightness")?;
        if brightness == 0 {
            self.switch(false, transition_time).await?;
        }
        Ok(brightness)
    }

    pub(crate) async fn set_brightness(
        &mut self,
        brightness: i32,
        transition_time: Option<Duration>,
    ) -> Result<u8> {
        let brightness = Brightness::clamped(brightness);
        let mut payload = Payload::new();
        with_transition(
            payload.on(!brightness.is_zero()).brightness(brightness),
            transition_time,
        );

        match self.set_state(&payload).await {
            Ok(changes) => self.attribute(&changes, "brightness"),
            Err(e) if e.is_cannot_modify_while_off() => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn set_alert(&mut self, alert: &str) -> Result<String> {
        let alert = Alert::from_str(alert).map_err(|_| {
            Error::protocol(format!(
                "cannot set alert to {alert:?}, only \"none\" and \"select\" are supported"
            ))
            .with_device(self.device)
        })?;

        let mut payload = Payload::new();
        payload.alert(alert);
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "alert")
    }

    pub(crate) async fn set_coordinates(
        &mut self,
        coordinates: [f64; 2],
        transition_time: Option<Duration>,
    ) -> Result<[f64; 2]> {
        let mut payload = Payload::new();
        with_transition(
            payload.coordinates(Coordinates::clamped(coordinates[0], coordinates[1])),
            transition_time,
        );
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "coordinates")
    }

    pub(crate) async fn set_hue(&mut self, hue: i64, transition_time: Option<Duration>) -> Result<u16> {
        let mut payload = Payload::new();
        with_transition(payload.hue(Hue::wrapped(hue)), transition_time);
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "hue")
    }

    pub(crate) async fn set_saturation(
        &mut self,
        saturation: i32,
        transition_time: Option<Duration>,
    ) -> Result<u8> {
        let mut payload = Payload::new();
        with_transition(
            payload.saturation(Saturation::clamped(saturation)),
            transition_time,
        );
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "saturation")
    }

    pub(crate) async fn set_effect(&mut self, effect: &str) -> Result<String> {
        let effect = Effect::from_str(effect).map_err(|_| {
            Error::protocol(format!(
                "cannot set effect to {effect:?}, only \"none\" and \"colorloop\" are supported"
            ))
            .with_device(self.device)
        })?;

        let mut payload = Payload::new();
        payload.effect(effect);
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "effect")
    }

    pub(crate) async fn set_temperature(
        &mut self,
        temperature: i32,
        transition_time: Option<Duration>,
    ) -> Result<u16> {
        let mut payload = Payload::new();
        with_transition(
            payload.temperature(Mireds::clamped(temperature)),
            transition_time,
        );
        let changes = self.set_state(&payload).await?;
        self.attribute(&changes, "temperature")
    }
}

/// Implements [`Dimmer`] for devices with a [`DeviceCore`].
macro_rules! impl_dimmer {
    ($($device:ident),+ $(,)?) => {$(
        impl $crate::features::Dimmer for $device {
            async fn state(&mut self) -> ::std::result::Result<$crate::State, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_state().await
            }

            async fn set_state(
                &mut self,
                payload: &$crate::Payload,
            ) -> ::std::result::Result<$crate::State, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_state(payload).await
            }

            fn transition_time(&self) -> Option<::std::time::Duration> {
                $crate::device::AsCore::core(self).transition_time
            }

            fn set_transition_time(&mut self, transition_time: Option<::std::time::Duration>) {
                $crate::device::AsCore::core_mut(self).transition_time = transition_time;
            }

            async fn on(
                &mut self,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<bool, $crate::Error> {
                $crate::device::AsCore::core_mut(self).switch(true, transition_time).await
            }

            async fn off(
                &mut self,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<bool, $crate::Error> {
                $crate::device::AsCore::core_mut(self).switch(false, transition_time).await
            }

            async fn is_on(&mut self) -> ::std::result::Result<bool, $crate::Error> {
                $crate::device::AsCore::core_mut(self).is_on().await
            }

            async fn brighter(
                &mut self,
                step: i32,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<u8, $crate::Error> {
                $crate::device::AsCore::core_mut(self).brighter(step, transition_time).await
            }

            async fn darker(
                &mut self,
                step: i32,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<u8, $crate::Error> {
                $crate::device::AsCore::core_mut(self).darker(step, transition_time).await
            }

            async fn brightness(&mut self) -> ::std::result::Result<u8, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("brightness").await
            }

            async fn set_brightness(
                &mut self,
                brightness: i32,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<u8, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_brightness(brightness, transition_time).await
            }

            async fn alert(&mut self) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("alert").await
            }

            async fn set_alert(&mut self, alert: &str) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_alert(alert).await
            }
        }
    )+};
}

/// Implements [`ColorController`] for devices with a [`DeviceCore`].
macro_rules! impl_color_controller {
    ($($device:ident),+ $(,)?) => {$(
        impl $crate::features::ColorController for $device {
            async fn coordinates(&mut self) -> ::std::result::Result<[f64; 2], $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("coordinates").await
            }

            async fn set_coordinates(
                &mut self,
                coordinates: [f64; 2],
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<[f64; 2], $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_coordinates(coordinates, transition_time).await
            }

            async fn hue(&mut self) -> ::std::result::Result<u16, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("hue").await
            }

            async fn set_hue(
                &mut self,
                hue: i64,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<u16, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_hue(hue, transition_time).await
            }

            async fn saturation(&mut self) -> ::std::result::Result<u8, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("saturation").await
            }

            async fn set_saturation(
                &mut self,
                saturation: i32,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<u8, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_saturation(saturation, transition_time).await
            }

            async fn effect(&mut self) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("effect").await
            }

            async fn set_effect(&mut self, effect: &str) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_effect(effect).await
            }

            async fn color_mode(&mut self) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("color_mode").await
            }
        }
    )+};
}

/// Implements [`TemperatureController`] for devices with a [`DeviceCore`].
macro_rules! impl_temperature_controller {
    ($($device:ident),+ $(,)?) => {$(
        impl $crate::features::TemperatureController for $device {
            async fn temperature(&mut self) -> ::std::result::Result<u16, $crate::Error> {
                $crate::device::AsCore::core_mut(self).read_attribute("temperature").await
            }

            async fn set_temperature(
                &mut self,
                temperature: i32,
                transition_time: Option<::std::time::Duration>,
            ) -> ::std::result::Result<u16, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_temperature(temperature, transition_time).await
            }
        }
    )+};
}

pub(crate) use {impl_color_controller, impl_dimmer, impl_temperature_controller};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::Bridge;
    use crate::device::DeviceKind;
    use crate::testing::{MockTransport, changes};
    use crate::transport::Method;

    fn light(transport: &MockTransport) -> DeviceCore {
        let bridge = Bridge::with_transport("10.0.0.2", Some("token"), transport.clone());
        DeviceCore::new(&bridge, DeviceKind::Light, 1, Some("Desk"))
    }

    fn light_resource(on: bool, bri: u8) -> String {
        json!({"name": "Desk", "state": {"on": on, "bri": bri, "alert": "none"}}).to_string()
    }

    #[test]
    fn test_brighter_wins_over_darker() {
        let mut state = State::new();
        state.insert("brighter".into(), json!(10));
        state.insert("darker".into(), json!(20));
        apply_brightness_step(&mut state);
        assert_eq!(Value::Object(state), json!({"bri_inc": 10}));

        let mut state = State::new();
        state.insert("darker".into(), json!(20));
        apply_brightness_step(&mut state);
        assert_eq!(Value::Object(state), json!({"bri_inc": -20}));
    }

    #[tokio::test]
    async fn test_set_brightness_sends_wire_names() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"on": true, "bri": 200})));
        let mut core = light(&transport);

        assert_eq!(core.set_brightness(200, None).await, Ok(200));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].url, "http://10.0.0.2/api/token/lights/1/state");
        assert_eq!(requests[0].body, Some(json!({"on": true, "bri": 200})));
    }

    #[tokio::test]
    async fn test_set_brightness_clamps_and_turns_off_at_zero() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"on": false, "bri": 0})));
        transport.respond(changes("/lights/1/state", json!({"on": true, "bri": 254})));
        let mut core = light(&transport);

        assert_eq!(core.set_brightness(-5, None).await, Ok(0));
        assert_eq!(core.set_brightness(400, None).await, Ok(254));

        let requests = transport.requests();
        assert_eq!(requests[0].body, Some(json!({"on": false, "bri": 0})));
        assert_eq!(requests[1].body, Some(json!({"on": true, "bri": 254})));
    }

    #[tokio::test]
    async fn test_set_brightness_while_off_reports_zero() {
        let transport = MockTransport::new();
        transport.respond_error(201, "parameter, bri, is not modifiable. Device is set to off.");
        let mut core = light(&transport);

        assert_eq!(core.set_brightness(100, None).await, Ok(0));
    }

    #[tokio::test]
    async fn test_brighter_reports_resulting_brightness() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"bri_inc": 20})));
        transport.respond(light_resource(true, 120));
        let mut core = light(&transport);

        assert_eq!(core.brighter(20, None).await, Ok(120));
        assert_eq!(transport.requests()[0].body, Some(json!({"bri_inc": 20})));
        assert_eq!(transport.requests()[1].method, Method::Get);
    }

    #[tokio::test]
    async fn test_brighter_turns_on_when_off() {
        let transport = MockTransport::new();
        transport.respond_error(201, "parameter, bri_inc, is not modifiable. Device is set to off.");
        transport.respond(changes("/lights/1/state", json!({"on": true, "bri_inc": 20})));
        transport.respond(light_resource(true, 21));
        let mut core = light(&transport);

        assert_eq!(core.brighter(20, None).await, Ok(21));
        assert_eq!(
            transport.requests()[1].body,
            Some(json!({"on": true, "bri_inc": 20}))
        );
    }

    #[tokio::test]
    async fn test_darker_to_zero_turns_off() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"bri_inc": -254})));
        transport.respond(light_resource(true, 0));
        transport.respond(changes("/lights/1/state", json!({"on": false})));
        let mut core = light(&transport);

        assert_eq!(core.darker(254, None).await, Ok(0));

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].body, Some(json!({"bri_inc": -254})));
        assert_eq!(requests[2].body, Some(json!({"on": false})));
    }

    #[tokio::test]
    async fn test_darker_while_off_reports_zero() {
        let transport = MockTransport::new();
        transport.respond_error(201, "parameter, bri_inc, is not modifiable. Device is set to off.");
        let mut core = light(&transport);

        assert_eq!(core.darker(10, None).await, Ok(0));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_alert_is_rejected_locally() {
        let transport = MockTransport::new();
        let mut core = light(&transport);

        let err = core.set_alert("lselect").await.unwrap_err();
        assert_eq!(err.code(), None);
        assert_eq!(err.device(), Some(core.device));
        assert!(transport.requests().is_empty());

        let err = core.set_effect("strobe").await.unwrap_err();
        assert_eq!(err.code(), None);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_hue_wraps_and_temperature_clamps() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"hue": 5})));
        transport.respond(changes("/lights/1/state", json!({"ct": 500})));
        let mut core = light(&transport);

        assert_eq!(core.set_hue(65540, None).await, Ok(5));
        assert_eq!(core.set_temperature(1000, None).await, Ok(500));

        let requests = transport.requests();
        assert_eq!(requests[0].body, Some(json!({"hue": 5})));
        assert_eq!(requests[1].body, Some(json!({"ct": 500})));
    }

    #[tokio::test]
    async fn test_transition_time_precedence() {
        let transport = MockTransport::new();
        for _ in 0..3 {
            transport.respond(changes("/lights/1/state", json!({"sat": 100})));
        }
        let mut core = light(&transport);
        core.bridge.set_transition_time(Some(Duration::from_secs(1))).await;

        core.set_saturation(100, None).await.unwrap();
        core.transition_time = Some(Duration::from_millis(500));
        core.set_saturation(100, None).await.unwrap();
        core.set_saturation(100, Some(Duration::from_millis(200))).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].body, Some(json!({"sat": 100, "transitiontime": 10})));
        assert_eq!(requests[1].body, Some(json!({"sat": 100, "transitiontime": 5})));
        assert_eq!(requests[2].body, Some(json!({"sat": 100, "transitiontime": 2})));
    }

    #[tokio::test]
    async fn test_brightness_restored_after_transition_off() {
        let transport = MockTransport::new();
        // off with transition: read brightness, then write
        transport.respond(light_resource(true, 180));
        transport.respond(changes("/lights/1/state", json!({"on": false})));
        // on: check on state, then write with restored brightness
        transport.respond(light_resource(false, 1));
        transport.respond(changes("/lights/1/state", json!({"on": true, "bri": 180})));
        let mut core = light(&transport);

        assert_eq!(core.switch(false, Some(Duration::from_secs(1))).await, Ok(false));
        assert_eq!(core.reset_brightness, Some(180));

        assert_eq!(core.switch(true, None).await, Ok(true));
        assert_eq!(core.reset_brightness, None);

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[1].body, Some(json!({"on": false, "transitiontime": 10})));
        assert_eq!(requests[3].body, Some(json!({"on": true, "bri": 180})));
    }

    #[tokio::test]
    async fn test_explicit_brightness_is_not_overridden() {
        let transport = MockTransport::new();
        transport.respond(light_resource(false, 1));
        transport.respond(changes("/lights/1/state", json!({"on": true, "bri": 50})));
        let mut core = light(&transport);
        core.reset_brightness = Some(180);

        assert_eq!(core.set_brightness(50, None).await, Ok(50));
        assert_eq!(core.reset_brightness, None);
        assert_eq!(transport.requests()[1].body, Some(json!({"on": true, "bri": 50})));
    }

    #[tokio::test]
    async fn test_off_without_transition_skips_workaround() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"on": false})));
        let mut core = light(&transport);

        assert_eq!(core.switch(false, None).await, Ok(false));
        assert_eq!(core.reset_brightness, None);
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_dimming_out_does_not_remember_zero() {
        let transport = MockTransport::new();
        transport.respond(changes("/lights/1/state", json!({"bri_inc": -254})));
        transport.respond(light_resource(true, 0));
        // off with transition reads the brightness first
        transport.respond(light_resource(true, 0));
        transport.respond(changes("/lights/1/state", json!({"on": false})));
        let mut core = light(&transport);

        assert_eq!(core.darker(254, Some(Duration::from_secs(1))).await, Ok(0));
        assert_eq!(core.reset_brightness, None);

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[3].body, Some(json!({"on": false, "transitiontime": 10})));
    }

    #[tokio::test]
    async fn test_empty_payload_is_rejected_locally() {
        let transport = MockTransport::new();
        let mut core = light(&transport);

        assert_eq!(core.set_state(&Payload::new()).await, Err(Error::NoAttribute));

        let mut payload = Payload::new();
        payload.transition_time(Duration::from_secs(1));
        assert_eq!(core.set_state(&payload).await, Err(Error::NoAttribute));
        assert!(transport.requests().is_empty());
    }
}
