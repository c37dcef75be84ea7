//! Lights.
//!
//! The bridge reports a type for every light; each supported type maps to a
//! struct implementing the matching capabilities:
//!
//! | Bridge type               | Struct                  | Capabilities                         |
//! |---------------------------|-------------------------|--------------------------------------|
//! | `Dimmable light`          | [`DimmableLight`]         | [`Dimmer`]                           |
//! | `Color light`             | [`ColorLight`]            | [`Dimmer`], [`ColorController`]      |
//! | `Color temperature light` | [`ColorTemperatureLight`] | [`Dimmer`], [`TemperatureController`] |
//! | `Extended color light`    | [`ExtendedColorLight`]    | all three                            |
//!
//! [`Bridge::lights`] returns them wrapped in [`Light`].
//!
//! [`Dimmer`]: crate::Dimmer
//! [`ColorController`]: crate::ColorController
//! [`TemperatureController`]: crate::TemperatureController

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::bridge::Bridge;
use crate::device::{DeviceCore, DeviceKind, impl_device};
use crate::errors::Error;
use crate::features::{impl_color_controller, impl_dimmer, impl_temperature_controller};

type Result<T> = std::result::Result<T, Error>;

/// Light types supported by this library, as named by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
pub enum LightType {
    #[strum(serialize = "Dimmable light")]
    Dimmable,
    #[strum(serialize = "Color light")]
    Color,
    #[strum(serialize = "Color temperature light")]
    ColorTemperature,
    #[strum(serialize = "Extended color light")]
    ExtendedColor,
}

macro_rules! light_structs {
    ($($(#[$doc:meta])* $light:ident),+ $(,)?) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $light {
            pub(crate) core: DeviceCore,
        }

        impl $light {
            pub fn new(bridge: &Bridge, id: u32, name: Option<&str>) -> Self {
                $light {
                    core: DeviceCore::new(bridge, DeviceKind::Light, id, name),
                }
            }

            /// Whether the bridge can currently reach the light.
            pub async fn is_reachable(&mut self) -> Result<bool> {
                self.core.read_attribute("is_reachable").await
            }
        }
    )+};
}

light_structs!(
    /// A light with brightness control only.
    DimmableLight,
    /// A light with brightness and color control.
    ColorLight,
    /// A white light with adjustable color temperature.
    ColorTemperatureLight,
    /// A light with brightness, color and color temperature control.
    ExtendedColorLight,
);

impl_device!(DimmableLight, ColorLight, ColorTemperatureLight, ExtendedColorLight);
impl_dimmer!(DimmableLight, ColorLight, ColorTemperatureLight, ExtendedColorLight);
impl_color_controller!(ColorLight, ExtendedColorLight);
impl_temperature_controller!(ColorTemperatureLight, ExtendedColorLight);

/// Any supported light.
///
/// Implements the capabilities common to all lights; match on the variant
/// for color or temperature control.
#[derive(Debug, Clone)]
pub enum Light {
    Dimmable(DimmableLight),
    Color(ColorLight),
    ColorTemperature(ColorTemperatureLight),
    ExtendedColor(ExtendedColorLight),
}

impl_device!(enum Light { Dimmable, Color, ColorTemperature, ExtendedColor });
impl_dimmer!(Light);

impl Light {
    /// Creates the light for a type name reported by the bridge.
    pub fn from_listing(bridge: &Bridge, id: u32, name: Option<&str>, light_type: &str) -> Result<Self> {
        let light_type = LightType::from_str(light_type).map_err(|_| Error::UnsupportedDevice {
            kind: DeviceKind::Light.to_string(),
            device_type: light_type.to_string(),
        })?;
        Ok(Self::new(bridge, id, name, light_type))
    }

    pub fn new(bridge: &Bridge, id: u32, name: Option<&str>, light_type: LightType) -> Self {
        match light_type {
            LightType::Dimmable => Light::Dimmable(DimmableLight::new(bridge, id, name)),
            LightType::Color => Light::Color(ColorLight::new(bridge, id, name)),
            LightType::ColorTemperature => {
                Light::ColorTemperature(ColorTemperatureLight::new(bridge, id, name))
            }
            LightType::ExtendedColor => {
                Light::ExtendedColor(ExtendedColorLight::new(bridge, id, name))
            }
        }
    }

    pub fn light_type(&self) -> LightType {
        match self {
            Light::Dimmable(_) => LightType::Dimmable,
            Light::Color(_) => LightType::Color,
            Light::ColorTemperature(_) => LightType::ColorTemperature,
            Light::ExtendedColor(_) => LightType::ExtendedColor,
        }
    }

    pub async fn is_reachable(&mut self) -> Result<bool> {
        match self {
            Light::Dimmable(light) => light.is_reachable().await,
            Light::Color(light) => light.is_reachable().await,
            Light::ColorTemperature(light) => light.is_reachable().await,
            Light::ExtendedColor(light) => light.is_reachable().await,
        }
    }
}
