//! Observed response type

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the service actually answered for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedResult {
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body, `None` when the body is not valid JSON
    pub body: Option<Value>,
    /// Response body as text
    pub raw: String,
}

impl ObservedResult {
    /// Builds an observed result from a status and raw body text.
    ///
    /// A body that does not parse as JSON is not an error: `body` is left
    /// empty and the text stays available in `raw`.
    #[must_use]
    pub fn from_raw(status: u16, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let body = serde_json::from_str(&raw).ok();
        Self { status, body, raw }
    }

    /// Returns true if the body parsed as JSON.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.body.is_some()
    }

    /// Looks up a top-level field of a JSON object body.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(key))
    }
}
