//! Lazy page iteration.

use crate::client::GraphClient;
use crate::options::Options;
use crate::parse::Payload;
use crate::Result;
use reqwest::Method;

/// Keys that only make sense for the request that initiated pagination.
const PAGING_KEYS: [&str; 3] = ["offset", "until", "since"];

/// Forward-only, one-pass sequence of result pages.
///
/// Each pull performs one blocking request; iteration ends when the
/// response carries no further page cursor. Service-reported errors are
/// yielded as [`Payload::Error`] items so consumers can inspect them per
/// page; a transport failure is yielded as an `Err` item and ends the
/// iteration.
pub struct Pages<'a> {
    client: &'a GraphClient,
    next_url: Option<String>,
    options: Options,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(client: &'a GraphClient, url: String, options: Options) -> Self {
        Self {
            client,
            next_url: Some(url),
            options,
        }
    }
}

impl Iterator for Pages<'_> {
    type Item = Result<Payload>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = self.next_url.take()?;

        match self.client.dispatch(Method::GET, &url, self.options.clone()) {
            Ok((payload, cursor)) => {
                self.next_url = cursor;
                // The cursor embeds its own result window; the initiating
                // window parameters must not leak into the next pull.
                for key in PAGING_KEYS {
                    self.options.remove(key);
                }
                Some(Ok(payload))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
