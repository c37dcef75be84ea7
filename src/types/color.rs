//! Hue, saturation and CIE xy color representations.

use serde::{Deserialize, Serialize};

/// Hue on the bridge's color wheel, 0 to 65534.
///
/// Values are cycled rather than clamped, so 65535 is red again, like 0.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Hue {
    pub(crate) value: u16,
}

impl Hue {
    const PERIOD: i64 = 65535;

    /// Wraps any value onto the color wheel.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Hue;
    ///
    /// assert_eq!(Hue::wrapped(65535), Hue::wrapped(0));
    /// assert_eq!(Hue::wrapped(65536).value(), 1);
    /// assert_eq!(Hue::wrapped(-1).value(), 65534);
    /// ```
    pub fn wrapped(value: i64) -> Self {
        Hue {
            value: value.rem_euclid(Self::PERIOD) as u16,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }
}

/// Color saturation from 0 (white) to 254 (fully colored).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct Saturation {
    pub(crate) value: u8,
}

impl Saturation {
    const MAX: i32 = 254;

    /// Clamps any value into the valid range (0-254).
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Saturation;
    ///
    /// assert_eq!(Saturation::clamped(300).value(), 254);
    /// assert_eq!(Saturation::clamped(-3).value(), 0);
    /// ```
    pub fn clamped(value: i32) -> Self {
        Saturation {
            value: value.clamp(0, Self::MAX) as u8,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

/// A point in the CIE xy color space, each coordinate between 0 and 1.
///
/// Each lamp picks the closest color inside its own gamut, so the confirmed
/// coordinates may differ from the requested ones.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(transparent)]
pub struct Coordinates {
    pub(crate) xy: [f64; 2],
}

impl Coordinates {
    /// Clamps each coordinate into 0..=1 independently.
    ///
    /// # Examples
    ///
    /// ```
    /// use huegely_rs::Coordinates;
    ///
    /// assert_eq!(Coordinates::clamped(1.5, -0.2).xy(), [1.0, 0.0]);
    /// assert_eq!(Coordinates::clamped(0.3, 0.4).xy(), [0.3, 0.4]);
    /// ```
    pub fn clamped(x: f64, y: f64) -> Self {
        Coordinates {
            xy: [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)],
        }
    }

    pub fn x(&self) -> f64 {
        self.xy[0]
    }

    pub fn y(&self) -> f64 {
        self.xy[1]
    }

    pub fn xy(&self) -> [f64; 2] {
        self.xy
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from(xy: [f64; 2]) -> Self {
        Coordinates::clamped(xy[0], xy[1])
    }
}
