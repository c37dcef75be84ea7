//! Device identity and the state plumbing shared by lights, groups and sensors.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display};

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::names::{self, State};

type Result<T> = std::result::Result<T, Error>;

/// The kinds of devices a bridge manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DeviceKind {
    Light,
    Group,
    Sensor,
}

impl DeviceKind {
    /// The API collection devices of this kind live in.
    pub fn collection(&self) -> &'static str {
        match self {
            DeviceKind::Light => "lights",
            DeviceKind::Group => "groups",
            DeviceKind::Sensor => "sensors",
        }
    }

    /// The attribute of a device resource holding its state.
    pub fn state_attribute(&self) -> &'static str {
        match self {
            DeviceKind::Light | DeviceKind::Sensor => "state",
            DeviceKind::Group => "action",
        }
    }
}

/// Identifies a device on a bridge, e.g. light 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceRef {
    pub kind: DeviceKind,
    pub id: u32,
}

impl DeviceRef {
    pub fn new(kind: DeviceKind, id: u32) -> Self {
        DeviceRef { kind, id }
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Operations every device supports.
pub trait Device {
    fn device_ref(&self) -> DeviceRef;

    fn id(&self) -> u32;

    /// The name seen on the last read, without contacting the bridge.
    fn cached_name(&self) -> Option<&str>;

    /// Reads the current name from the bridge.
    fn name(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Renames the device. Returns the new name as confirmed by the bridge.
    fn set_name(&mut self, name: &str) -> impl Future<Output = Result<String>> + Send;
}

/// State shared by every concrete device type.
#[derive(Debug, Clone)]
pub(crate) struct DeviceCore {
    pub(crate) bridge: Bridge,
    pub(crate) device: DeviceRef,
    pub(crate) name: Option<String>,
    pub(crate) transition_time: Option<Duration>,
    /// Brightness to restore on the next "on", see `DeviceCore::restore_brightness`.
    pub(crate) reset_brightness: Option<u8>,
}

impl DeviceCore {
    pub(crate) fn new(bridge: &Bridge, kind: DeviceKind, id: u32, name: Option<&str>) -> Self {
        DeviceCore {
            bridge: bridge.clone(),
            device: DeviceRef::new(kind, id),
            name: name.map(String::from),
            transition_time: None,
            reset_brightness: None,
        }
    }

    /// Resource path of the device, e.g. `lights/1`.
    pub(crate) fn path(&self) -> String {
        format!("{}/{}", self.device.kind.collection(), self.device.id)
    }

    /// Resource path of the device's writable state, e.g. `groups/1/action`.
    pub(crate) fn state_path(&self) -> String {
        format!("{}/{}", self.path(), self.device.kind.state_attribute())
    }

    /// Reads the whole device resource. The name comes for free, so it is cached.
    pub(crate) async fn fetch(&mut self) -> Result<Value> {
        let resource = self
            .bridge
            .get(&self.path())
            .await
            .map_err(|e| e.with_device(self.device))?;

        if let Some(name) = resource.get("name").and_then(Value::as_str) {
            self.name = Some(name.to_string());
        }
        Ok(resource)
    }

    /// Reads the device state, with semantic attribute names.
    pub(crate) async fn read_state(&mut self) -> Result<State> {
        let attribute = self.device.kind.state_attribute();
        let mut resource = self.fetch().await?;
        match resource.get_mut(attribute).map(Value::take) {
            Some(Value::Object(state)) => Ok(names::to_semantic(state)),
            _ => Err(Error::missing_attribute(attribute, Some(self.device))),
        }
    }

    /// Sends a state update with semantic attribute names and returns the
    /// attributes the bridge confirmed, with semantic names.
    pub(crate) async fn write_state(&self, state: State) -> Result<State> {
        debug!("{}: writing state {:?}", self.device, state);
        let changes = self
            .bridge
            .put(&self.state_path(), names::to_wire(state))
            .await
            .map_err(|e| e.with_device(self.device))?;
        Ok(names::to_semantic(changes))
    }

    pub(crate) async fn name(&mut self) -> Result<String> {
        let resource = self.fetch().await?;
        self.attribute_of(&resource, "name")
    }

    pub(crate) async fn set_name(&mut self, name: &str) -> Result<String> {
        let mut body = State::new();
        body.insert("name".to_string(), json!(name));

        let changes = self
            .bridge
            .put(&self.path(), body)
            .await
            .map_err(|e| e.with_device(self.device))?;
        let name: String = self.attribute(&changes, "name")?;
        self.name = Some(name.clone());
        Ok(name)
    }

    /// The transition time to use: per call, else per device, else the bridge default.
    pub(crate) async fn effective_transition(&self, requested: Option<Duration>) -> Option<Duration> {
        match requested.or(self.transition_time) {
            Some(duration) => Some(duration),
            None => self.bridge.transition_time().await,
        }
    }

    /// Extracts a typed attribute from a state map.
    pub(crate) fn attribute<T: DeserializeOwned>(&self, state: &State, name: &str) -> Result<T> {
        let value = state
            .get(name)
            .ok_or_else(|| Error::missing_attribute(name, Some(self.device)))?;
        serde_json::from_value(value.clone()).map_err(Error::JsonLoad)
    }

    fn attribute_of<T: DeserializeOwned>(&self, resource: &Value, name: &str) -> Result<T> {
        match resource {
            Value::Object(map) => self.attribute(map, name),
            _ => Err(Error::missing_attribute(name, Some(self.device))),
        }
    }

    /// Reads a single attribute from the device's full resource (not its state).
    pub(crate) async fn read_resource_attribute<T: DeserializeOwned>(
        &mut self,
        name: &str,
    ) -> Result<T> {
        let resource = self.fetch().await?;
        self.attribute_of(&resource, name)
    }

    /// Reads a single attribute from the device state.
    pub(crate) async fn read_attribute<T: DeserializeOwned>(&mut self, name: &str) -> Result<T> {
        let state = self.read_state().await?;
        self.attribute(&state, name)
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unknown name)")
    }
}

/// Access to the shared core of a device, implemented by `impl_device!`.
pub(crate) trait AsCore {
    fn core(&self) -> &DeviceCore;

    fn core_mut(&mut self) -> &mut DeviceCore;
}

/// Implements [`Device`], `Display` and `label` for structs with a
/// `core: DeviceCore` field, or for enums wrapping such structs.
macro_rules! impl_device {
    (@common $device:ident) => {
        impl $crate::device::Device for $device {
            fn device_ref(&self) -> $crate::device::DeviceRef {
                $crate::device::AsCore::core(self).device
            }

            fn id(&self) -> u32 {
                $crate::device::AsCore::core(self).device.id
            }

            fn cached_name(&self) -> Option<&str> {
                $crate::device::AsCore::core(self).name.as_deref()
            }

            async fn name(&mut self) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).name().await
            }

            async fn set_name(&mut self, name: &str) -> ::std::result::Result<String, $crate::Error> {
                $crate::device::AsCore::core_mut(self).set_name(name).await
            }
        }

        impl ::std::fmt::Display for $device {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::device::AsCore::core(self).display_name())
            }
        }
    };
    (enum $device:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::device::AsCore for $device {
            fn core(&self) -> &$crate::device::DeviceCore {
                match self {
                    $($device::$variant(d) => $crate::device::AsCore::core(d),)+
                }
            }

            fn core_mut(&mut self) -> &mut $crate::device::DeviceCore {
                match self {
                    $($device::$variant(d) => $crate::device::AsCore::core_mut(d),)+
                }
            }
        }

        impl $device {
            /// Type, name and id of the wrapped device.
            pub fn label(&self) -> String {
                match self {
                    $($device::$variant(d) => d.label(),)+
                }
            }
        }

        $crate::device::impl_device!(@common $device);
    };
    ($($device:ident),+ $(,)?) => {$(
        impl $crate::device::AsCore for $device {
            fn core(&self) -> &$crate::device::DeviceCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut $crate::device::DeviceCore {
                &mut self.core
            }
        }

        impl $device {
            /// Type, name and id, e.g. `DimmableLight Desk (id: 1)`.
            pub fn label(&self) -> String {
                format!(
                    "{} {} (id: {})",
                    stringify!($device),
                    self.core.display_name(),
                    self.core.device.id
                )
            }
        }

        $crate::device::impl_device!(@common $device);
    )+};
}

pub(crate) use impl_device;
