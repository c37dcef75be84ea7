//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use serde_json::{Value, json};

use crate::errors::Error;
use crate::runtime::BoxFuture;
use crate::transport::{Method, Transport};

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

#[derive(Debug)]
enum Response {
    Body(String),
    Fail(Error),
    /// Never completes.
    Stall,
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Response>,
    requests: Vec<Request>,
}

/// Answers requests with queued bodies, in order, and records every request.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, response: Response) {
        self.script.lock().unwrap().responses.push_back(response);
    }

    pub fn respond(&self, body: impl Into<String>) {
        self.push(Response::Body(body.into()));
    }

    /// Fails the next request with `err`, as a broken connection would.
    pub fn fail(&self, err: Error) {
        self.push(Response::Fail(err));
    }

    pub fn stall(&self) {
        self.push(Response::Stall);
    }

    pub fn respond_error(&self, code: u16, description: &str) {
        self.respond(
            json!([{"error": {"type": code, "address": "/", "description": description}}])
                .to_string(),
        );
    }

    pub fn requests(&self) -> Vec<Request> {
        self.script.lock().unwrap().requests.clone()
    }
}

impl Transport for MockTransport {
    fn send<'a>(
        &'a self,
        method: Method,
        url: &'a str,
        body: Option<&'a Value>,
    ) -> BoxFuture<'a, Result<String, Error>> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(Request {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
        match script.responses.pop_front() {
            Some(Response::Body(body)) => futures::future::ready(Ok(body)).boxed(),
            Some(Response::Fail(err)) => futures::future::ready(Err(err)).boxed(),
            Some(Response::Stall) => futures::future::pending().boxed(),
            None => futures::future::ready(Err(Error::protocol(format!(
                "no scripted response for {method} {url}"
            ))))
            .boxed(),
        }
    }
}

/// A write response confirming `attributes` under `prefix`, e.g.
/// `[{"success": {"/lights/1/state/bri": 200}}]`.
pub(crate) fn changes(prefix: &str, attributes: Value) -> String {
    let outcomes: Vec<Value> = attributes
        .as_object()
        .into_iter()
        .flatten()
        .map(|(name, value)| json!({"success": {format!("{prefix}/{name}"): value}}))
        .collect();
    Value::Array(outcomes).to_string()
}

/// Listing of an extended color light (1) and a dimmable light (2).
pub(crate) fn lights_listing() -> String {
    json!({
        "2": {"name": "Hallway", "type": "Dimmable light",
              "state": {"on": false, "bri": 1, "alert": "none", "reachable": true}},
        "1": {"name": "Desk", "type": "Extended color light",
              "state": {"on": true, "bri": 254, "hue": 14678, "sat": 254,
                        "xy": [0.5, 0.5], "ct": 154, "alert": "none",
                        "effect": "none", "colormode": "hs", "reachable": true}}
    })
    .to_string()
}
