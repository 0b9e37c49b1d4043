//! Batch requests and positional response demultiplexing.

use crate::parse::{parse, Payload};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a combined batch call: method, relative URL and an
/// optional body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub method: String,
    pub relative_url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub body: Option<String>,
}

impl BatchRequest {
    pub fn new(method: impl Into<String>, relative_url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            relative_url: relative_url.into(),
            body: None,
        }
    }

    pub fn get(relative_url: impl Into<String>) -> Self {
        Self::new("GET", relative_url)
    }

    pub fn post(relative_url: impl Into<String>) -> Self {
        Self::new("POST", relative_url)
    }

    pub fn delete(relative_url: impl Into<String>) -> Self {
        Self::new("DELETE", relative_url)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Ordered, one-pass demultiplexer over a batch response.
///
/// Each pull parses the inbound entry at the ordinal position of its
/// originating request. Empty entries yield `None` (an empty marker, not an
/// error — some batched sub-calls legitimately produce nothing); error
/// payloads carry the originating [`BatchRequest`] for correlation.
#[derive(Debug)]
pub struct BatchResponses {
    pairs: std::iter::Zip<std::vec::IntoIter<Value>, std::vec::IntoIter<BatchRequest>>,
}

impl BatchResponses {
    pub(crate) fn new(responses: Vec<Value>, requests: Vec<BatchRequest>) -> Self {
        Self {
            pairs: responses.into_iter().zip(requests),
        }
    }
}

impl Iterator for BatchResponses {
    type Item = Option<Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        let (entry, request) = self.pairs.next()?;

        let body = match entry.get("body").and_then(Value::as_str) {
            Some(body) => body.to_owned(),
            None => return Some(None),
        };

        let payload = match parse(&body) {
            Payload::Error(error) => Payload::Error(error.with_request(request)),
            payload => payload,
        };

        Some(Some(payload))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}
