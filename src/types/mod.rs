//! Value types for light control parameters.

mod alert;
mod brightness;
mod color;
mod mireds;

pub use alert::{Alert, Effect};
pub use brightness::Brightness;
pub use color::{Coordinates, Hue, Saturation};
pub use mireds::Mireds;
