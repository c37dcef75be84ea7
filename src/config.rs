//! Bridge connection options and bridge configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Everything needed to connect to a bridge, e.g. loaded from a config file.
///
/// ```
/// use huegely_rs::BridgeOptions;
///
/// let options: BridgeOptions = serde_json::from_str(
///     r#"{"address": "192.168.1.2", "token": "abc", "transition_time_ms": 400}"#,
/// ).unwrap();
/// assert_eq!(options.transition_time(), Some(std::time::Duration::from_millis(400)));
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Host name or IP address of the bridge.
    pub address: String,
    /// Access token, see [`Bridge::get_token`](crate::Bridge::get_token).
    #[serde(default)]
    pub token: Option<String>,
    /// Default transition time for all devices on the bridge.
    #[serde(default)]
    pub transition_time_ms: Option<u64>,
}

impl BridgeOptions {
    pub fn new(address: &str) -> Self {
        BridgeOptions {
            address: address.to_string(),
            token: None,
            transition_time_ms: None,
        }
    }

    pub fn transition_time(&self) -> Option<Duration> {
        self.transition_time_ms.map(Duration::from_millis)
    }
}

/// Bridge configuration as reported by the `config` endpoint.
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BridgeConfig {
    pub name: String,
    #[serde(default, rename = "bridgeid")]
    pub bridge_id: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default, rename = "ipaddress")]
    pub ip_address: Option<String>,
    #[serde(default, rename = "modelid")]
    pub model_id: Option<String>,
    #[serde(default, rename = "swversion")]
    pub sw_version: Option<String>,
    #[serde(default, rename = "apiversion")]
    pub api_version: Option<String>,
    #[serde(default, rename = "zigbeechannel")]
    pub zigbee_channel: Option<u8>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, rename = "linkbutton")]
    pub link_button: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_config_from_partial_document() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{"name": "Philips hue", "swversion": "1941132080", "apiversion": "1.41.0",
                "zigbeechannel": 15, "whitelist": {}}"#,
        )
        .unwrap();

        assert_eq!(config.name, "Philips hue");
        assert_eq!(config.api_version.as_deref(), Some("1.41.0"));
        assert_eq!(config.zigbee_channel, Some(15));
        assert_eq!(config.mac, None);
    }

    #[test]
    fn test_options_skip_unset_fields() {
        let options = BridgeOptions::new("hue.local");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({"address": "hue.local"})
        );
        assert_eq!(options.transition_time(), None);
    }
}
