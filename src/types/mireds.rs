//! Color temperature control.

use serde::{Deserialize, Serialize};

/// White color temperature in mireds (micro reciprocal degrees), 154 to 500.
///
/// Lower values produce cooler (more blue) light, higher values warmer light.
/// Typical values:
/// - 153: roughly 6500K, daylight
/// - 250: 4000K, neutral white
/// - 370: roughly 2700K, warm white
/// - 500: 2000K, candle light
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Mireds {
    pub(crate) value: u16,
}

impl Default for Mireds {
    fn default() -> Self {
        Mireds { value: Self::MIN as u16 }
    }
}

impl Mireds {
    const MIN: i32 = 154;
    const MAX: i32 = 500;

    /// Get the mired value.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Create a new Mireds with the given value.
    ///
    /// Returns `None` if value is outside the valid range (154-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Mireds;
    ///
    /// assert!(Mireds::create(153).is_none());
    /// assert!(Mireds::create(154).is_some());
    /// assert!(Mireds::create(500).is_some());
    /// assert!(Mireds::create(501).is_none());
    /// ```
    pub fn create(value: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&i32::from(value)) {
            Some(Mireds { value })
        } else {
            None
        }
    }

    /// Clamps any value into the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Mireds;
    ///
    /// assert_eq!(Mireds::clamped(100).value(), 154);
    /// assert_eq!(Mireds::clamped(900).value(), 500);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Mireds {
            value: value.clamp(Self::MIN, Self::MAX) as u16,
        }
    }

    /// Converts a Kelvin temperature to the nearest valid mired value.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Mireds;
    ///
    /// assert_eq!(Mireds::from_kelvin(4000).value(), 250);
    /// assert_eq!(Mireds::from_kelvin(10000).value(), 154);
    /// ```
    pub fn from_kelvin(kelvin: u32) -> Self {
        let mireds = 1_000_000f64 / f64::from(kelvin.max(1));
        Self::clamped(mireds.round() as i32)
    }
}
