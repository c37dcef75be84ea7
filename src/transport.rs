//! HTTP transport used to reach the bridge.

use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::errors::Error;
use crate::runtime::BoxFuture;

type Result<T> = std::result::Result<T, Error>;

/// HTTP verbs used by the bridge API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Put,
    Post,
}

/// Sends HTTP requests to a bridge.
///
/// Implementations return the raw response body; status codes carry no
/// meaning for the bridge API, errors are reported in the body. The bridge
/// bounds every call with its own timeout, so implementations need not.
///
/// The default implementation is [`HttpTransport`] (feature `reqwest`).
/// Supply your own to use another HTTP client or runtime.
pub trait Transport: Send + Sync {
    /// Send `body` (as JSON, if any) to `url` and return the response body.
    fn send<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        body: Option<&'a Value>,
    ) -> BoxFuture<'a, Result<String>>;
}

#[cfg(feature = "reqwest")]
pub use http::HttpTransport;

#[cfg(feature = "reqwest")]
mod http {
    use futures::FutureExt;
    use log::debug;
    use serde_json::Value;

    use super::{Method, Result, Transport};
    use crate::errors::Error;
    use crate::runtime::BoxFuture;

    /// [`Transport`] backed by a [`reqwest::Client`].
    #[derive(Debug, Clone, Default)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Use a preconfigured client (proxy, TLS settings, ...).
        pub fn with_client(client: reqwest::Client) -> Self {
            HttpTransport { client }
        }
    }

    impl From<Method> for reqwest::Method {
        fn from(method: Method) -> Self {
            match method {
                Method::Get => reqwest::Method::GET,
                Method::Put => reqwest::Method::PUT,
                Method::Post => reqwest::Method::POST,
            }
        }
    }

    impl Transport for HttpTransport {
        fn send<'a>(
            &'a self,
            method: Method,
            url: &'a str,
            body: Option<&'a Value>,
        ) -> BoxFuture<'a, Result<String>> {
            async move {
                let mut request = self.client.request(method.into(), url);
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| Error::transport("send", e))?;
                debug!("HTTP {} {} -> {}", method, url, response.status());

                response
                    .text()
                    .await
                    .map_err(|e| Error::transport("read body", e))
            }
            .boxed()
        }
    }
}
