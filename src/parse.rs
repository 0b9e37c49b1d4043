//! Response body parsing.
//!
//! The service mixes structured JSON, bare text, bare booleans and two
//! generations of error shapes; [`parse`] folds all of that into the closed
//! [`Payload`] variant so consumers can discriminate by type.

use crate::error::GraphError;
use serde_json::Value;

/// Outcome of parsing one response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured JSON, including bare `true`/`false` bodies.
    Json(Value),
    /// The body was not valid JSON; returned verbatim.
    Raw(String),
    /// The service reported an error in its payload.
    Error(GraphError),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// True for the bare `false` body the service uses to signal a denied
    /// or failed mutating operation.
    pub fn is_false(&self) -> bool {
        matches!(self, Payload::Json(Value::Bool(false)))
    }

    /// URL of the next page of results, when the payload carries one.
    pub(crate) fn next_page_url(&self) -> Option<&str> {
        self.as_json()?.get("paging")?.get("next")?.as_str()
    }
}

/// Parse a raw response body.
///
/// Non-JSON bodies are not errors: some endpoints legitimately return bare
/// text. Mutating endpoints sometimes answer with bare `true`/`false`
/// instead of a structured body; those decode as `Json(Value::Bool(_))` and
/// their interpretation is left to the calling operation.
pub fn parse(body: &str) -> Payload {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return Payload::Raw(body.to_owned()),
    };

    if let Some(object) = value.as_object() {
        if let Some(error) = object.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            let code = error.get("code").and_then(Value::as_i64);

            let error = if error.get("type").and_then(Value::as_str) == Some("OAuthException") {
                GraphError::oauth(message, code)
            } else {
                GraphError::service(message, code)
            };

            return Payload::Error(error);
        }

        // Errors occasionally arrive in the legacy shape.
        if let Some(message) = object.get("error_msg") {
            let message = message.as_str().unwrap_or_default().to_owned();
            let code = object.get("error_code").and_then(Value::as_i64);

            return Payload::Error(GraphError::service(message, code));
        }
    }

    Payload::Json(value)
}
