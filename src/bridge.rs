//! The bridge handle: request layer, bridge settings and device catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::BridgeConfig;
use crate::device::Device;
use crate::errors::Error;
use crate::group::Group;
use crate::light::Light;
use crate::names::State;
use crate::response::{self, Reply};
use crate::runtime::{self, Mutex};
use crate::sensor::Sensor;
use crate::transport::{Method, Transport};

type Result<T> = std::result::Result<T, Error>;

/// Upper bound for a single request to the bridge.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A Philips Hue bridge.
///
/// Cloning is cheap; clones share the transport and the default transition
/// time. Every device keeps a clone of the bridge it was listed by.
///
/// ```no_run
/// use huegely_rs::{Bridge, Dimmer};
///
/// # async fn demo() -> Result<(), huegely_rs::Error> {
/// let bridge = Bridge::new("192.168.1.2", Some("my-token"));
/// for mut light in bridge.lights().await? {
///     light.on(None).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Bridge {
    address: String,
    token: Option<String>,
    transition_time: Arc<Mutex<Option<Duration>>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("address", &self.address)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct LightListing {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    light_type: String,
}

#[derive(Debug, Deserialize)]
struct GroupListing {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    action: State,
}

#[derive(Debug, Deserialize)]
struct SensorListing {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    sensor_type: String,
    #[serde(default)]
    state: State,
}

impl Bridge {
    /// Creates a bridge talking HTTP through [`HttpTransport`](crate::HttpTransport).
    ///
    /// Without a token only [`Bridge::get_token`] works.
    #[cfg(feature = "reqwest")]
    pub fn new(address: &str, token: Option<&str>) -> Self {
        Self::with_transport(address, token, crate::transport::HttpTransport::new())
    }

    /// Creates a bridge from connection options.
    #[cfg(feature = "reqwest")]
    pub fn from_options(options: &crate::BridgeOptions) -> Self {
        let mut bridge = Self::new(&options.address, options.token.as_deref());
        bridge.transition_time = Arc::new(Mutex::new(options.transition_time()));
        bridge
    }

    /// Creates a bridge using a custom transport.
    pub fn with_transport<T>(address: &str, token: Option<&str>, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        Bridge {
            address: address.to_string(),
            token: token.map(String::from),
            transition_time: Arc::new(Mutex::new(None)),
            transport: Arc::new(transport),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Sets the access token, e.g. one returned by [`Bridge::get_token`].
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Default transition time for devices without one of their own.
    pub async fn transition_time(&self) -> Option<Duration> {
        *self.transition_time.lock().await
    }

    /// Changes the default transition time, for this bridge and all its clones.
    pub async fn set_transition_time(&self, transition_time: Option<Duration>) {
        *self.transition_time.lock().await = transition_time;
    }

    /// Asks the bridge for a new access token for `app_identifier`.
    ///
    /// The link button on the bridge has to be pressed shortly before,
    /// otherwise this fails with error code
    /// [`LINK_BUTTON_NOT_PRESSED`](crate::LINK_BUTTON_NOT_PRESSED).
    pub async fn get_token(&self, app_identifier: &str) -> Result<String> {
        let url = format!("http://{}/api", self.address);
        let body = json!({"devicetype": app_identifier});

        match self.send(Method::Post, &url, Some(&body)).await? {
            Reply::Changes(mut changes) => match changes.remove("username") {
                Some(Value::String(token)) => Ok(token),
                _ => Err(Error::missing_attribute("username", None)),
            },
            Reply::Document(document) => Err(Error::protocol(format!(
                "unexpected token response: {document}"
            ))),
        }
    }

    /// Sends a request to `path` below the authenticated API root.
    pub async fn request(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Reply> {
        let token = self.token.as_deref().ok_or(Error::NoToken)?;
        let url = format!(
            "http://{}/api/{}/{}",
            self.address,
            token,
            path.trim_start_matches('/')
        );
        self.send(method, &url, body).await
    }

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Reply> {
        debug!("{method} {url} {body:?}");
        let text = runtime::timeout(REQUEST_TIMEOUT, self.transport.send(method, url, body))
            .await
            .map_err(|_| Error::Timeout)??;
        debug!("response: {text}");
        response::parse(method, &text)
    }

    /// Reads `path` and returns the document as is.
    pub async fn get(&self, path: &str) -> Result<Value> {
        Ok(self.request(path, Method::Get, None).await?.into_value())
    }

    /// Writes `body` (wire attribute names) to `path` and returns the confirmed
    /// attributes (wire names).
    pub async fn put(&self, path: &str, body: State) -> Result<State> {
        let body = Value::Object(body);
        match self.request(path, Method::Put, Some(&body)).await? {
            Reply::Changes(changes) => Ok(changes),
            Reply::Document(document) => Err(Error::protocol(format!(
                "unexpected write response: {document}"
            ))),
        }
    }

    pub async fn config(&self) -> Result<BridgeConfig> {
        let document = self.get("config").await?;
        serde_json::from_value(document).map_err(Error::JsonLoad)
    }

    pub async fn name(&self) -> Result<String> {
        Ok(self.config().await?.name)
    }

    /// Renames the bridge. Returns the new name as confirmed by the bridge.
    pub async fn set_name(&self, name: &str) -> Result<String> {
        let mut body = State::new();
        body.insert("name".to_string(), json!(name));

        match self.put("config", body).await?.remove("name") {
            Some(Value::String(name)) => Ok(name),
            _ => Err(Error::missing_attribute("name", None)),
        }
    }

    /// All supported lights known to the bridge, sorted by id.
    ///
    /// Devices of other types, such as plugs, are skipped.
    pub async fn lights(&self) -> Result<Vec<Light>> {
        let listing: BTreeMap<String, LightListing> = self.listing("lights").await?;
        let mut lights = Vec::with_capacity(listing.len());
        for (id, light) in listing {
            let id = parse_id(&id)?;
            match Light::from_listing(self, id, light.name.as_deref(), &light.light_type) {
                Ok(light) => lights.push(light),
                Err(e) => warn!("skipping light {id}: {e}"),
            }
        }
        lights.sort_by_key(Light::id);
        Ok(lights)
    }

    /// All groups known to the bridge, sorted by id.
    pub async fn groups(&self) -> Result<Vec<Group>> {
        let listing: BTreeMap<String, GroupListing> = self.listing("groups").await?;
        let mut groups = listing
            .into_iter()
            .map(|(id, group)| {
                Group::from_listing(self, parse_id(&id)?, group.name.as_deref(), group.action)
            })
            .collect::<Result<Vec<_>>>()?;
        groups.sort_by_key(Group::id);
        Ok(groups)
    }

    /// All supported sensors known to the bridge, sorted by id.
    ///
    /// Sensors of other types are skipped.
    pub async fn sensors(&self) -> Result<Vec<Sensor>> {
        let listing: BTreeMap<String, SensorListing> = self.listing("sensors").await?;
        let mut sensors = Vec::with_capacity(listing.len());
        for (id, sensor) in listing {
            let id = parse_id(&id)?;
            match Sensor::from_listing(self, id, sensor.name.as_deref(), &sensor.sensor_type, sensor.state) {
                Ok(sensor) => sensors.push(sensor),
                Err(e) => warn!("skipping sensor {id}: {e}"),
            }
        }
        sensors.sort_by_key(Sensor::id);
        Ok(sensors)
    }

    async fn listing<T>(&self, path: &str) -> Result<BTreeMap<String, T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let document = self.get(path).await?;
        serde_json::from_value(document).map_err(Error::JsonLoad)
    }
}

fn parse_id(id: &str) -> Result<u32> {
    id.parse()
        .map_err(|_| Error::protocol(format!("invalid device id {id:?}")))
}
