//! # huegely_rs
//!
//! An async Rust client for the Philips Hue bridge REST API.
//!
//! This crate provides a **runtime-agnostic** async API to the lights, groups
//! and sensors managed by a Hue bridge on your local network. It supports
//! switching and dimming, colors, white color temperature, alerts and effects,
//! and reading temperature and motion sensors.
//!
//! ## Quick Start
//!
//! ```no_run
//! use huegely_rs::{Bridge, Dimmer, Light, ColorController};
//!
//! async fn control_lights() -> Result<(), huegely_rs::Error> {
//!     // A token is issued by the bridge, see `Bridge::get_token`
//!     let bridge = Bridge::new("192.168.1.2", Some("my-token"));
//!
//!     for light in bridge.lights().await? {
//!         if let Light::ExtendedColor(mut light) = light {
//!             light.on(None).await?;
//!             light.set_hue(46920, None).await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Getting a Token
//!
//! The bridge only answers authenticated requests. Press the link button on
//! the bridge, then ask it for a token within 30 seconds:
//!
//! ```no_run
//! use huegely_rs::Bridge;
//!
//! # async fn register() -> Result<(), huegely_rs::Error> {
//! let mut bridge = Bridge::new("192.168.1.2", None);
//! let token = bridge.get_token("my-app#laptop").await?;
//! bridge.set_token(&token);
//! # Ok(())
//! # }
//! ```
//!
//! Store the token; it stays valid until removed in the Hue app.
//!
//! ## Devices
//!
//! - **Lights**: [`DimmableLight`], [`ColorLight`], [`ColorTemperatureLight`]
//!   and [`ExtendedColorLight`], listed as [`Light`] by [`Bridge::lights`]
//! - **Groups**: the matching [`DimmableGroup`], [`ColorGroup`],
//!   [`ColorTemperatureGroup`] and [`ExtendedColorGroup`], listed as
//!   [`Group`] by [`Bridge::groups`]
//! - **Sensors**: [`TemperatureSensor`] and [`MotionSensor`], listed as
//!   [`Sensor`] by [`Bridge::sensors`]
//!
//! What a device can do is expressed by the capability traits [`Dimmer`],
//! [`ColorController`] and [`TemperatureController`]; [`Device`] covers ids
//! and names.
//!
//! ## Attribute Names
//!
//! State maps use descriptive attribute names (`brightness`, `temperature`,
//! `coordinates`, ...) instead of the bridge's short ones (`bri`, `ct`, `xy`,
//! ...). See [`wire_name`] and [`semantic_name`].
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! huegely-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std or smol
//!
//! The bundled HTTP client requires tokio, so bring your own [`Transport`]:
//!
//! ```toml
//! [dependencies]
//! huegely-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime
//! - `reqwest` (default): [`HttpTransport`] and [`Bridge::new`], requires `runtime-tokio`

mod bridge;
mod config;
mod device;
mod errors;
mod features;
mod group;
mod light;
mod names;
mod payload;
mod response;
pub mod runtime;
mod sensor;
#[cfg(test)]
mod testing;
mod transport;
mod types;

// Re-export public API
pub use bridge::{Bridge, REQUEST_TIMEOUT};
pub use config::{BridgeConfig, BridgeOptions};
pub use device::{Device, DeviceKind, DeviceRef};
pub use errors::{CANNOT_MODIFY_WHILE_OFF, Error, LINK_BUTTON_NOT_PRESSED};
pub use features::{ColorController, Dimmer, TemperatureController};
pub use group::{ColorGroup, ColorTemperatureGroup, DimmableGroup, ExtendedColorGroup, Group};
pub use light::{ColorLight, ColorTemperatureLight, DimmableLight, ExtendedColorLight, Light, LightType};
pub use names::{State, semantic_name, to_semantic, to_wire, wire_name};
pub use payload::{Payload, transition_steps};
pub use response::Reply;
pub use sensor::{MotionSensor, Sensor, SensorType, TemperatureSensor};
#[cfg(feature = "reqwest")]
pub use transport::HttpTransport;
pub use transport::{Method, Transport};
pub use types::{Alert, Brightness, Coordinates, Effect, Hue, Mireds, Saturation};
