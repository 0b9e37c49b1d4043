//! Blocking HTTP transport.
//!
//! One [`HttpTransport`] wraps one long-lived `reqwest` session (connection
//! pool included) for the lifetime of the owning client.

use crate::options::Upload;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::Method;
use std::env;
use std::time::Duration;

#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build the underlying session. The timeout is env-overridable via
    /// `FACEGRAPH_HTTP_TIMEOUT_SECS`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let timeout = env::var("FACEGRAPH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(timeout);

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Perform one HTTP exchange and return the raw response body.
    ///
    /// GET/DELETE send the fields as query parameters and follow redirects;
    /// POST/PUT send them as a form body, switching to multipart when
    /// uploads are present. Status codes are not interpreted here: the
    /// service reports errors in the body, not the status line.
    pub fn execute(
        &self,
        method: Method,
        url: &str,
        fields: Vec<(String, String)>,
        uploads: Vec<(String, Upload)>,
    ) -> Result<String, TransportError> {
        let request = if method == Method::GET || method == Method::DELETE {
            self.client.request(method, url).query(&fields)
        } else if uploads.is_empty() {
            self.client.request(method, url).form(&fields)
        } else {
            let mut form = Form::new();
            for (name, value) in fields {
                form = form.text(name, value);
            }
            for (name, upload) in uploads {
                let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
                if let Some(mime_type) = upload.mime_type {
                    part = part.mime_str(&mime_type).map_err(TransportError::Http)?;
                }
                form = form.part(name, part);
            }
            self.client.request(method, url).multipart(form)
        };

        let response = request.send().map_err(TransportError::Http)?;
        response.text().map_err(TransportError::Http)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Other(String),
}
