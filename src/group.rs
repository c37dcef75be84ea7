//! Light groups and rooms.
//!
//! Groups are controlled like lights, through their `action` attribute. The
//! bridge does not report a group type matching the light types, so the
//! variant is inferred from the attributes the group's action supports.

use log::debug;

use crate::bridge::Bridge;
use crate::device::{AsCore, Device, DeviceCore, DeviceKind, impl_device};
use crate::errors::Error;
use crate::features::{impl_color_controller, impl_dimmer, impl_temperature_controller};
use crate::light::Light;
use crate::names::{self, State};

type Result<T> = std::result::Result<T, Error>;

macro_rules! group_structs {
    ($($(#[$doc:meta])* $group:ident),+ $(,)?) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $group {
            pub(crate) core: DeviceCore,
        }

        impl $group {
            pub fn new(bridge: &Bridge, id: u32, name: Option<&str>) -> Self {
                $group {
                    core: DeviceCore::new(bridge, DeviceKind::Group, id, name),
                }
            }

            /// The lights in this group, sorted by id.
            pub async fn lights(&mut self) -> Result<Vec<Light>> {
                self.core.group_lights().await
            }

            /// The bridge's type for the group, e.g. `LightGroup` or `Room`.
            pub async fn group_type(&mut self) -> Result<String> {
                self.core.read_resource_attribute("type").await
            }
        }
    )+};
}

group_structs!(
    /// A group with brightness control only.
    DimmableGroup,
    /// A group with brightness and color control.
    ColorGroup,
    /// A group of white lights with adjustable color temperature.
    ColorTemperatureGroup,
    /// A group with brightness, color and color temperature control.
    ExtendedColorGroup,
);

impl_device!(DimmableGroup, ColorGroup, ColorTemperatureGroup, ExtendedColorGroup);
impl_dimmer!(DimmableGroup, ColorGroup, ColorTemperatureGroup, ExtendedColorGroup);
impl_color_controller!(ColorGroup, ExtendedColorGroup);
impl_temperature_controller!(ColorTemperatureGroup, ExtendedColorGroup);

/// Any supported group.
#[derive(Debug, Clone)]
pub enum Group {
    Dimmable(DimmableGroup),
    Color(ColorGroup),
    ColorTemperature(ColorTemperatureGroup),
    ExtendedColor(ExtendedColorGroup),
}

impl_device!(enum Group { Dimmable, Color, ColorTemperature, ExtendedColor });
impl_dimmer!(Group);

impl Group {
    /// Creates the group matching the attributes of its action, as listed by
    /// the bridge (bridge attribute names).
    pub fn from_listing(bridge: &Bridge, id: u32, name: Option<&str>, action: State) -> Result<Self> {
        let action = names::to_semantic(action);
        let has = |attribute: &str| action.contains_key(attribute);

        let group = if has("temperature") && has("hue") {
            Group::ExtendedColor(ExtendedColorGroup::new(bridge, id, name))
        } else if has("temperature") {
            Group::ColorTemperature(ColorTemperatureGroup::new(bridge, id, name))
        } else if has("hue") {
            Group::Color(ColorGroup::new(bridge, id, name))
        } else if has("brightness") {
            Group::Dimmable(DimmableGroup::new(bridge, id, name))
        } else {
            return Err(Error::UnknownGroupType(action));
        };
        Ok(group)
    }

    pub async fn lights(&mut self) -> Result<Vec<Light>> {
        self.core_mut().group_lights().await
    }

    pub async fn group_type(&mut self) -> Result<String> {
        self.core_mut().read_resource_attribute("type").await
    }
}

impl DeviceCore {
    async fn group_lights(&mut self) -> Result<Vec<Light>> {
        let ids: Vec<String> = self.read_resource_attribute("lights").await?;
        debug!("{}: member lights {:?}", self.device, ids);

        let lights = self.bridge.lights().await?;
        Ok(lights
            .into_iter()
            .filter(|light| ids.iter().any(|id| id.parse::<u32>().ok() == Some(light.id())))
            .collect())
    }
}
