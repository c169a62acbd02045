//! Push-channel protocol types shared between server and client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Path of the push channel on the page's own host.
pub const TWEETS_PATH: &str = "/ws/tweets";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame has no numeric `value` field")]
    MissingValue,
}

/// Sample pushed from the server to the browser: `{"value": 7}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueFrame {
    pub value: f64,
}

/// Reply sent by the server in response to a [`WsCommand`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Notice {
    Status { stream: String },
}

impl Notice {
    pub fn status(message: impl Into<String>) -> Self {
        Notice::Status {
            stream: message.into(),
        }
    }
}

/// Commands a page may send to the server. The chart widget itself never
/// sends any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WsCommand {
    LoadStream,
    StartStream,
    StopStream,
}

/// Extract the numeric `value` field of a frame. Every other field is ignored.
pub fn parse_value(text: &str) -> Result<f64, FrameError> {
    let frame: Value = serde_json::from_str(text)?;
    frame
        .get("value")
        .and_then(Value::as_f64)
        .ok_or(FrameError::MissingValue)
}

/// Build the push-channel URL for a page served from `host` over `protocol`
/// (as reported by `window.location.protocol`, e.g. `"https:"`).
pub fn socket_url(protocol: &str, host: &str, path: &str) -> String {
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}{path}")
}

/// Browser-side connection lifecycle. There is no transition back out of
/// `Closed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn on_open(&mut self) {
        if *self == ConnectionState::Connecting {
            *self = ConnectionState::Open;
        }
    }

    pub fn on_close(&mut self) {
        *self = ConnectionState::Closed;
    }

    /// Connected only once the browser has established the socket.
    pub fn is_open(&self) -> bool {
        *self == ConnectionState::Open
    }
}
