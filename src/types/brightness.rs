//! Brightness control for Hue lights and groups.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 254, as used by the bridge.
///
/// A brightness of 0 is the dimmest level the bridge accepts; the library
/// treats it as "off" when setting brightness.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MIN: i32 = 0;
    const MAX: i32 = 254;

    /// Create a new Brightness at full level.
    pub fn new() -> Self {
        Brightness {
            value: Self::MAX as u8,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (0-254).
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Brightness;
    ///
    /// assert!(Brightness::create(254).is_some());
    /// assert!(Brightness::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if i32::from(value) <= Self::MAX {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Clamps any value into the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(-10).value(), 0);
    /// assert_eq!(Brightness::clamped(1000).value(), 254);
    /// assert_eq!(Brightness::clamped(120).value(), 120);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Brightness {
            value: value.clamp(Self::MIN, Self::MAX) as u8,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}
