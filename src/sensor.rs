//! Sensors.
//!
//! Sensor readings are cached: every accessor takes a `max_age`, and a cached
//! state younger than that is returned without contacting the bridge. A zero
//! `max_age` always reads fresh state.

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDateTime;
use log::debug;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::bridge::Bridge;
use crate::device::{DeviceCore, DeviceKind, impl_device};
use crate::errors::Error;
use crate::names::{self, State};
use crate::runtime::Instant;

type Result<T> = std::result::Result<T, Error>;

/// Format of sensor timestamps reported by the bridge.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Sensor types supported by this library, as named by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
pub enum SensorType {
    #[strum(serialize = "ZLLTemperature")]
    Temperature,
    #[strum(serialize = "ZLLPresence")]
    Motion,
}

/// Last state read from the bridge and when it was read.
#[derive(Debug, Clone)]
struct CachedState {
    state: State,
    read_at: Instant,
}

impl CachedState {
    fn new(state: State) -> Self {
        CachedState {
            state,
            read_at: Instant::now(),
        }
    }

    fn fresh(&self, max_age: Duration) -> Option<&State> {
        (!max_age.is_zero() && self.read_at.elapsed() <= max_age).then_some(&self.state)
    }
}

impl DeviceCore {
    async fn cached_state(&mut self, cache: &mut Option<CachedState>, max_age: Duration) -> Result<State> {
        if let Some(state) = cache.as_ref().and_then(|cached| cached.fresh(max_age)) {
            debug!("{}: using cached state", self.device);
            return Ok(state.clone());
        }

        let state = self.read_state().await?;
        *cache = Some(CachedState::new(state.clone()));
        Ok(state)
    }
}

macro_rules! sensor_structs {
    ($($(#[$doc:meta])* $sensor:ident),+ $(,)?) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $sensor {
            pub(crate) core: DeviceCore,
            cache: Option<CachedState>,
        }

        impl $sensor {
            pub fn new(bridge: &Bridge, id: u32, name: Option<&str>) -> Self {
                $sensor {
                    core: DeviceCore::new(bridge, DeviceKind::Sensor, id, name),
                    cache: None,
                }
            }

            /// Creates the sensor with a state already read, e.g. from a
            /// listing (bridge attribute names).
            pub(crate) fn with_state(bridge: &Bridge, id: u32, name: Option<&str>, state: State) -> Self {
                let mut sensor = Self::new(bridge, id, name);
                sensor.cache = Some(CachedState::new(names::to_semantic(state)));
                sensor
            }

            /// The sensor state, read from the bridge unless the cached state
            /// is at most `max_age` old.
            pub async fn state(&mut self, max_age: Duration) -> Result<State> {
                self.core.cached_state(&mut self.cache, max_age).await
            }
        }
    )+};
}

sensor_structs!(
    /// A temperature sensor, e.g. the one built into the Hue motion sensor.
    TemperatureSensor,
    /// A presence sensor.
    MotionSensor,
);

impl_device!(TemperatureSensor, MotionSensor);

impl TemperatureSensor {
    /// Temperature in degrees Celsius.
    pub async fn temperature(&mut self, max_age: Duration) -> Result<f64> {
        let state = self.state(max_age).await?;
        let hundredths: i64 = self.core.attribute(&state, "temperature")?;
        Ok(hundredths as f64 / 100.0)
    }
}

impl MotionSensor {
    /// Whether presence was detected.
    pub async fn presence(&mut self, max_age: Duration) -> Result<bool> {
        let state = self.state(max_age).await?;
        self.core.attribute(&state, "presence")
    }

    /// When the sensor state last changed, in the bridge's time zone.
    pub async fn last_updated(&mut self, max_age: Duration) -> Result<NaiveDateTime> {
        let state = self.state(max_age).await?;
        let timestamp: String = self.core.attribute(&state, "last_updated")?;
        NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
            .map_err(|_| Error::InvalidTimestamp(timestamp))
    }
}

/// Any supported sensor.
#[derive(Debug, Clone)]
pub enum Sensor {
    Temperature(TemperatureSensor),
    Motion(MotionSensor),
}

impl_device!(enum Sensor { Temperature, Motion });

impl Sensor {
    /// Creates the sensor for a type name reported by the bridge, seeding
    /// its cache with `state`.
    pub fn from_listing(
        bridge: &Bridge,
        id: u32,
        name: Option<&str>,
        sensor_type: &str,
        state: State,
    ) -> Result<Self> {
        let sensor_type = SensorType::from_str(sensor_type).map_err(|_| Error::UnsupportedDevice {
            kind: DeviceKind::Sensor.to_string(),
            device_type: sensor_type.to_string(),
        })?;

        Ok(match sensor_type {
            SensorType::Temperature => {
                Sensor::Temperature(TemperatureSensor::with_state(bridge, id, name, state))
            }
            SensorType::Motion => Sensor::Motion(MotionSensor::with_state(bridge, id, name, state)),
        })
    }

    pub fn sensor_type(&self) -> SensorType {
        match self {
            Sensor::Temperature(_) => SensorType::Temperature,
            Sensor::Motion(_) => SensorType::Motion,
        }
    }

    pub async fn state(&mut self, max_age: Duration) -> Result<State> {
        match self {
            Sensor::Temperature(sensor) => sensor.state(max_age).await,
            Sensor::Motion(sensor) => sensor.state(max_age).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::device::Device;
    use crate::testing::MockTransport;

    const MINUTE: Duration = Duration::from_secs(60);

    fn bridge(transport: &MockTransport) -> Bridge {
        Bridge::with_transport("10.0.0.2", Some("token"), transport.clone())
    }

    fn temperature_resource(raw: i64) -> String {
        json!({"name": "Hallway temperature", "type": "ZLLTemperature",
               "state": {"temperature": raw, "lastupdated": "2017-08-27T19:03:50"}})
        .to_string()
    }

    fn motion_resource(timestamp: &str) -> String {
        json!({"name": "Hallway motion", "type": "ZLLPresence",
               "state": {"presence": false, "lastupdated": timestamp}})
        .to_string()
    }

    #[tokio::test]
    async fn test_temperature_in_celsius() {
        let transport = MockTransport::new();
        transport.respond(temperature_resource(2214));
        let mut sensor = TemperatureSensor::new(&bridge(&transport), 1, None);

        assert_eq!(sensor.temperature(Duration::ZERO).await, Ok(22.14));
        assert_eq!(transport.requests()[0].url, "http://10.0.0.2/api/token/sensors/1");
        assert_eq!(sensor.cached_name(), Some("Hallway temperature"));
    }

    #[tokio::test]
    async fn test_cache_hit_issues_no_request() {
        let transport = MockTransport::new();
        transport.respond(temperature_resource(2214));
        let mut sensor = TemperatureSensor::new(&bridge(&transport), 1, None);

        sensor.temperature(MINUTE).await.unwrap();
        assert_eq!(sensor.temperature(MINUTE).await, Ok(22.14));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_max_age_always_reads() {
        let transport = MockTransport::new();
        transport.respond(temperature_resource(2214));
        transport.respond(temperature_resource(1850));
        let mut sensor = TemperatureSensor::new(&bridge(&transport), 1, None);

        assert_eq!(sensor.temperature(Duration::ZERO).await, Ok(22.14));
        assert_eq!(sensor.temperature(Duration::ZERO).await, Ok(18.5));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_listing_state_seeds_cache() {
        let transport = MockTransport::new();
        let state = match json!({"presence": true, "lastupdated": "2017-08-27T18:22:21"}) {
            serde_json::Value::Object(state) => state,
            _ => unreachable!(),
        };
        let mut sensor = Sensor::from_listing(&bridge(&transport), 2, None, "ZLLPresence", state).unwrap();
        assert_eq!(sensor.sensor_type(), SensorType::Motion);

        let state = sensor.state(MINUTE).await.unwrap();
        assert_eq!(state.get("presence"), Some(&json!(true)));
        assert_eq!(state.get("last_updated"), Some(&json!("2017-08-27T18:22:21")));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_motion_sensor() {
        let transport = MockTransport::new();
        transport.respond(motion_resource("2017-08-27T18:22:21"));
        let mut sensor = MotionSensor::new(&bridge(&transport), 2, None);

        assert_eq!(sensor.presence(Duration::ZERO).await, Ok(false));
        let expected = NaiveDate::from_ymd_opt(2017, 8, 27)
            .and_then(|d| d.and_hms_opt(18, 22, 21))
            .unwrap();
        assert_eq!(sensor.last_updated(MINUTE).await, Ok(expected));
    }

    #[tokio::test]
    async fn test_invalid_timestamp() {
        let transport = MockTransport::new();
        transport.respond(motion_resource("none"));
        let mut sensor = MotionSensor::new(&bridge(&transport), 2, None);

        assert_eq!(
            sensor.last_updated(Duration::ZERO).await,
            Err(Error::InvalidTimestamp("none".to_string()))
        );
    }

    #[test]
    fn test_unsupported_type() {
        let bridge = bridge(&MockTransport::new());
        let err = Sensor::from_listing(&bridge, 3, Some("Daylight"), "Daylight", State::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDevice { .. }));
    }
}
