//! Bridge response types.
//!
//! The bridge answers reads with the requested document and writes with a list
//! of per-attribute outcomes, without using HTTP status codes for errors. The
//! shape of the decoded body is the only discriminant, so every body is first
//! parsed into a [`Reply`].

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::Error;
use crate::names::State;
use crate::transport::Method;

type Result<T> = std::result::Result<T, Error>;

/// A processed response from the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A document returned unmodified by a read (`GET`).
    Document(Value),
    /// Attributes successfully changed by a write, keyed by the last segment
    /// of each resource path, e.g. `{"bri": 200}`.
    Changes(State),
}

impl Reply {
    /// Converts the reply into a JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Reply::Document(value) => value,
            Reply::Changes(changes) => Value::Object(changes),
        }
    }
}

/// One entry of a write response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Outcome {
    Success(Map<String, Value>),
    Error(Failure),
}

/// Error details reported by the bridge.
#[derive(Debug, Deserialize)]
pub(crate) struct Failure {
    #[serde(rename = "type")]
    pub code: u16,
    #[serde(default)]
    pub address: Option<String>,
    pub description: String,
}

/// Parses a response body returned for a request made with `method`.
pub(crate) fn parse(method: Method, body: &str) -> Result<Reply> {
    if body.trim().is_empty() {
        return Err(nothing_returned());
    }

    let document: Value = serde_json::from_str(body).map_err(Error::JsonLoad)?;
    if is_empty(&document) {
        return Err(nothing_returned());
    }

    match outcomes(&document) {
        Some(outcomes) => collect_changes(outcomes).map(Reply::Changes),
        None if method == Method::Get => Ok(Reply::Document(document)),
        None => Err(Error::protocol(format!(
            "unexpected response to {method} request: {document}"
        ))),
    }
}

fn nothing_returned() -> Error {
    Error::protocol("API returned nothing")
}

fn is_empty(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Returns the outcome list if every entry of `document` is a success or an error entry.
fn outcomes(document: &Value) -> Option<Vec<Outcome>> {
    if !document.is_array() {
        return None;
    }
    Vec::<Outcome>::deserialize(document).ok()
}

fn collect_changes(outcomes: Vec<Outcome>) -> Result<State> {
    let mut changes = State::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Success(resources) => {
                for (resource, value) in resources {
                    changes.insert(attribute_from_resource(&resource).to_string(), value);
                }
            }
            Outcome::Error(failure) => {
                debug!(
                    "bridge error {} at {:?}: {}",
                    failure.code, failure.address, failure.description
                );
                return Err(Error::api(failure.code, &failure.description));
            }
        }
    }
    Ok(changes)
}

/// The attribute a resource path refers to, e.g. `bri` for `/lights/1/state/bri`.
fn attribute_from_resource(resource: &str) -> &str {
    resource.rsplit('/').next().unwrap_or(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_response_is_flattened() {
        let reply = parse(
            Method::Put,
            r#"[{"success": {"/lights/1/state/bri": 200}}, {"success": {"/lights/1/state/on": true}}]"#,
        )
        .unwrap();

        let Reply::Changes(changes) = reply else {
            panic!("expected changes");
        };
        assert_eq!(Value::Object(changes), json!({"bri": 200, "on": true}));
    }

    #[test]
    fn test_error_entry_raises() {
        let err = parse(
            Method::Put,
            r#"[{"success": {"/lights/1/state/on": true}},
                {"error": {"type": 201, "address": "/lights/1/state/bri", "description": "parameter, bri, is not modifiable. Device is set to off."}}]"#,
        )
        .unwrap_err();

        assert_eq!(err.code(), Some(201));
        assert!(err.is_cannot_modify_while_off());
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse(
            Method::Put,
            r#"[{"error": {"type": 7, "description": "invalid value"}},
                {"error": {"type": 201, "description": "off"}}]"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(7));
    }

    #[test]
    fn test_read_returns_document() {
        let reply = parse(Method::Get, r#"{"name": "Light 1", "state": {"on": true}}"#).unwrap();
        assert_eq!(
            reply,
            Reply::Document(json!({"name": "Light 1", "state": {"on": true}}))
        );
    }

    #[test]
    fn test_read_of_plain_list_is_untouched() {
        let reply = parse(Method::Get, r#"[{"bri": 100, "hue": 100}]"#).unwrap();
        assert_eq!(reply, Reply::Document(json!([{"bri": 100, "hue": 100}])));
    }

    #[test]
    fn test_read_error_is_raised() {
        let err = parse(
            Method::Get,
            r#"[{"error": {"type": 1, "address": "/", "description": "unauthorized user"}}]"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), Some(1));
    }

    #[test]
    fn test_empty_bodies_are_errors() {
        for body in ["", "  ", "null", "{}", "[]", "\"\""] {
            let err = parse(Method::Get, body).unwrap_err();
            assert_eq!(err, Error::protocol("API returned nothing"), "body {body:?}");
            assert_eq!(err.code(), None);
        }
    }

    #[test]
    fn test_write_with_document_is_protocol_error() {
        let err = parse(Method::Put, r#"{"bri": 1}"#).unwrap_err();
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_attribute_from_resource() {
        assert_eq!(attribute_from_resource("/lights/1/state/bri"), "bri");
        assert_eq!(attribute_from_resource("username"), "username");
    }
}
