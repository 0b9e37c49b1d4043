use crate::batch::{BatchRequest, BatchResponses};
use crate::client::builder::GraphClientBuilder;
use crate::error::GraphError;
use crate::options::Options;
use crate::paging::Pages;
use crate::parse::{parse, Payload};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

/// Search target types the service accepts.
pub const SEARCH_TYPES: [&str; 7] = [
    "post", "user", "page", "event", "group", "place", "checkin",
];

/// Blocking Graph API client.
///
/// Holds an optional access token and one long-lived transport session,
/// reused across calls. All operations take `&self` and block until the
/// underlying HTTP exchange completes; the client assumes single-owner
/// usage.
#[derive(Debug)]
pub struct GraphClient {
    pub(crate) base_url: String,
    pub(crate) access_token: Option<String>,
    pub(crate) retry_limit: u32,
    pub(crate) transport: HttpTransport,
}

impl GraphClient {
    /// Client for the default endpoint with an access token.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        GraphClientBuilder::new().access_token(access_token).build()
    }

    /// Client for unauthenticated calls.
    pub fn unauthenticated() -> Result<Self> {
        GraphClientBuilder::new().build()
    }

    pub fn builder() -> GraphClientBuilder {
        GraphClientBuilder::new()
    }

    /// Get an item.
    ///
    /// Service-reported errors are retried up to the configured attempt
    /// ceiling, then the last one is surfaced. A bare `false` body becomes
    /// a "could not get" error.
    pub fn get(&self, path: &str, options: Options) -> Result<Payload> {
        self.get_with_retry(path, options, self.retry_limit)
    }

    /// Like [`GraphClient::get`] with an explicit attempt ceiling for this
    /// call.
    pub fn get_with_retry(&self, path: &str, options: Options, retry: u32) -> Result<Payload> {
        let url = self.url_for(path);
        let mut attempts = retry.max(1);

        loop {
            let (payload, _) = self.dispatch(Method::GET, &url, options.clone())?;

            match payload {
                Payload::Error(error) => {
                    attempts -= 1;
                    if attempts == 0 {
                        return Err(error.into());
                    }
                    warn!(path, remaining = attempts, %error, "retrying after service error");
                }
                payload if payload.is_false() => {
                    return Err(
                        GraphError::service(format!("could not get {:?}", path), None).into(),
                    );
                }
                payload => return Ok(payload),
            }
        }
    }

    /// Pages of results for a GET, pulled lazily.
    ///
    /// No request is made until the first pull.
    pub fn get_paged(&self, path: &str, options: Options) -> Pages<'_> {
        Pages::new(self, self.url_for(path), options)
    }

    /// Post an item.
    pub fn post(&self, path: &str, data: Options) -> Result<Payload> {
        let (payload, _) = self.dispatch(Method::POST, &self.url_for(path), data)?;

        match payload {
            Payload::Error(error) => Err(error.into()),
            payload if payload.is_false() => {
                Err(GraphError::service(format!("could not post to {:?}", path), None).into())
            }
            payload => Ok(payload),
        }
    }

    /// Delete an item.
    pub fn delete(&self, path: &str) -> Result<Payload> {
        let (payload, _) = self.dispatch(Method::DELETE, &self.url_for(path), Options::new())?;

        match payload {
            Payload::Error(error) => Err(error.into()),
            payload if payload.is_false() => {
                Err(GraphError::service(format!("could not delete {:?}", path), None).into())
            }
            payload => Ok(payload),
        }
    }

    /// Search for items of a supported type (see [`SEARCH_TYPES`]).
    ///
    /// Fails fast on an unsupported type without touching the network.
    /// Caller-supplied `q`/`type` options are overwritten.
    pub fn search(&self, term: &str, kind: &str, options: Options) -> Result<Payload> {
        self.get("search", Self::search_options(term, kind, options)?)
    }

    /// Paged variant of [`GraphClient::search`].
    pub fn search_paged(&self, term: &str, kind: &str, options: Options) -> Result<Pages<'_>> {
        Ok(self.get_paged("search", Self::search_options(term, kind, options)?))
    }

    /// Run an FQL query.
    pub fn fql(&self, query: &str) -> Result<Payload> {
        self.get("fql", Options::new().set("q", query))
    }

    /// Make a batch request.
    ///
    /// The request list goes out as one POST; the returned iterator
    /// demultiplexes the sub-responses back to their originating entries.
    /// See [`BatchResponses`] for the per-entry contract.
    pub fn batch(&self, requests: Vec<BatchRequest>) -> Result<BatchResponses> {
        let encoded = serde_json::to_string(&requests)?;
        let payload = self.post("", Options::new().set("batch", encoded))?;

        match payload.into_json() {
            Some(Value::Array(responses)) => Ok(BatchResponses::new(responses, requests)),
            _ => Err(GraphError::service("batch response was not a list", None).into()),
        }
    }

    fn search_options(term: &str, kind: &str, options: Options) -> Result<Options> {
        if !SEARCH_TYPES.contains(&kind) {
            return Err(Error::InvalidArgument(format!(
                "unsupported search type {:?}; supported types are {}",
                kind,
                SEARCH_TYPES.join(", ")
            )));
        }

        Ok(options.set("q", term).set("type", kind))
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// One request/parse round trip: normalize the options, perform the
    /// call, parse the body and extract the next page cursor.
    pub(crate) fn dispatch(
        &self,
        method: Method,
        url: &str,
        options: Options,
    ) -> Result<(Payload, Option<String>)> {
        let (fields, uploads) = options
            .normalized(self.access_token.as_deref())
            .into_wire();

        debug!(%method, url, "dispatching request");

        let body = self.transport.execute(method, url, fields, uploads)?;
        let payload = parse(&body);
        let cursor = payload.next_page_url().map(str::to_owned);

        Ok((payload, cursor))
    }
}
