use crate::client::core::GraphClient;
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::time::Duration;
use url::Url;

/// Endpoint used unless overridden.
pub const DEFAULT_URL: &str = "https://graph.facebook.com";

/// Builder for creating clients with custom configuration.
pub struct GraphClientBuilder {
    access_token: Option<String>,
    base_url: String,
    retry_limit: u32,
    timeout: Duration,
}

impl GraphClientBuilder {
    pub fn new() -> Self {
        Self {
            access_token: None,
            base_url: DEFAULT_URL.to_owned(),
            retry_limit: 3,
            timeout: Duration::from_secs(30),
        }
    }

    /// Bearer token injected as the `access_token` parameter on every call.
    /// Absent means unauthenticated calls only.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the service endpoint.
    ///
    /// This is primarily for testing against a mock server. Trailing
    /// slashes are stripped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Ceiling on total `get` attempts when the service keeps reporting
    /// errors. Clamped to at least one attempt.
    pub fn retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = limit.max(1);
        self
    }

    /// Request timeout for the underlying session. Env-overridable via
    /// `FACEGRAPH_HTTP_TIMEOUT_SECS`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GraphClient> {
        let base_url = self.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)
            .map_err(|e| Error::InvalidArgument(format!("base URL {:?}: {}", base_url, e)))?;

        let transport = HttpTransport::new(self.timeout)?;

        Ok(GraphClient {
            base_url,
            access_token: self.access_token,
            retry_limit: self.retry_limit,
            transport,
        })
    }
}

impl Default for GraphClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
