use crate::device::DeviceRef;
use crate::names::State;

/// Vendor error code returned while registering an app before the bridge's
/// link button has been pressed.
pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;

/// Vendor error code returned when changing an attribute of a device that is off.
pub const CANNOT_MODIFY_WHILE_OFF: u16 = 201;

/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0:?}")]
    JsonDump(serde_json::Error),

    /// Failed to deserialize JSON data.
    #[error("failed to load json: {0:?}")]
    JsonLoad(serde_json::Error),

    /// The HTTP exchange with the bridge failed.
    #[error("transport {action} error: {err}")]
    Transport {
        action: String,
        #[source]
        err: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The bridge did not answer within the request timeout.
    #[error("request to bridge timed out")]
    Timeout,

    /// An error reported by the bridge, a malformed response, or a value
    /// rejected before it was sent.
    ///
    /// `code` carries the vendor error type when the bridge reported one.
    #[error("{}", hue_message(.code, .description, .device))]
    Hue {
        code: Option<u16>,
        description: String,
        device: Option<DeviceRef>,
    },

    /// A response did not contain an attribute the operation relies on.
    #[error("attribute {attribute} missing from response{}", device_suffix(.device))]
    MissingAttribute {
        attribute: String,
        device: Option<DeviceRef>,
    },

    /// None of the group variants matches the group's available actions.
    #[error("no matching group type for actions {0:?}")]
    UnknownGroupType(State),

    /// The bridge reported a device type this library has no model for.
    #[error("unsupported {kind} type {device_type:?}")]
    UnsupportedDevice { kind: String, device_type: String },

    /// A timestamp reported by the bridge could not be parsed.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// Attempted to send a [`crate::Payload`] with no attributes set.
    #[error("invalid payload; no attributes set")]
    NoAttribute,

    /// The bridge has no access token yet.
    #[error("no access token; acquire one with Bridge::get_token first")]
    NoToken,
}

impl Error {
    /// Create a new transport error
    pub fn transport<E>(action: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            action: action.to_string(),
            err: Box::new(err),
        }
    }

    /// Create an error reported by the bridge
    pub fn api(code: u16, description: &str) -> Self {
        Error::Hue {
            code: Some(code),
            description: description.to_string(),
            device: None,
        }
    }

    /// Create an error without a vendor code (protocol or validation failure)
    pub fn protocol(description: impl Into<String>) -> Self {
        Error::Hue {
            code: None,
            description: description.into(),
            device: None,
        }
    }

    /// Create a missing attribute error
    pub fn missing_attribute(attribute: &str, device: Option<DeviceRef>) -> Self {
        Error::MissingAttribute {
            attribute: attribute.to_string(),
            device,
        }
    }

    /// The vendor error code, if the bridge reported one.
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::Hue { code, .. } => *code,
            _ => None,
        }
    }

    /// The device the failed call was made for, if known.
    pub fn device(&self) -> Option<DeviceRef> {
        match self {
            Error::Hue { device, .. } | Error::MissingAttribute { device, .. } => *device,
            _ => None,
        }
    }

    pub fn is_cannot_modify_while_off(&self) -> bool {
        self.code() == Some(CANNOT_MODIFY_WHILE_OFF)
    }

    pub fn is_link_button_not_pressed(&self) -> bool {
        self.code() == Some(LINK_BUTTON_NOT_PRESSED)
    }

    /// Attribute the error to `device` unless it already names one.
    pub fn with_device(mut self, device: DeviceRef) -> Self {
        match &mut self {
            Error::Hue { device: slot, .. } | Error::MissingAttribute { device: slot, .. } => {
                slot.get_or_insert(device);
            }
            _ => {}
        }
        self
    }
}

fn hue_message(code: &Option<u16>, description: &str, device: &Option<DeviceRef>) -> String {
    match code {
        Some(code) => format!("hue error {code}: {description}{}", device_suffix(device)),
        None => format!("hue error: {description}{}", device_suffix(device)),
    }
}

fn device_suffix(device: &Option<DeviceRef>) -> String {
    device.map(|d| format!(" ({d})")).unwrap_or_default()
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceKind;

    #[test]
    fn test_with_device_keeps_code() {
        let light = DeviceRef::new(DeviceKind::Light, 3);
        let err = Error::api(CANNOT_MODIFY_WHILE_OFF, "parameter, bri, is not modifiable")
            .with_device(light);

        assert!(err.is_cannot_modify_while_off());
        assert_eq!(err.device(), Some(light));
        assert_eq!(
            err.to_string(),
            "hue error 201: parameter, bri, is not modifiable (light 3)"
        );
    }

    #[test]
    fn test_with_device_does_not_overwrite() {
        let first = DeviceRef::new(DeviceKind::Group, 1);
        let second = DeviceRef::new(DeviceKind::Light, 2);
        let err = Error::protocol("bad").with_device(first).with_device(second);
        assert_eq!(err.device(), Some(first));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_transport_errors_have_no_code() {
        let err = Error::transport(
            "send",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert_eq!(err.code(), None);
        assert!(!err.is_link_button_not_pressed());
        assert_eq!(err.with_device(DeviceRef::new(DeviceKind::Light, 1)).device(), None);
    }
}
