//! # facegraph
//!
//! Blocking client for Facebook's Graph API.
//!
//! The Graph API mixes structured JSON with bare text, bare booleans, two
//! generations of error shapes, nested pagination cursors and positionally
//! correlated batch responses. This crate folds that surface into one
//! uniform contract: every response becomes a [`Payload`] (structured
//! value, raw text, or typed error), convenience operations convert
//! service-reported errors into [`Error`], and paging/batching are exposed
//! as lazy, forward-only iterators.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use facegraph::{GraphClient, Options};
//!
//! fn main() -> facegraph::Result<()> {
//!     let graph = GraphClient::new("your-access-token")?;
//!
//!     // A single item.
//!     let me = graph.get("me", Options::new())?;
//!     println!("{:?}", me.as_json());
//!
//!     // Selected fields.
//!     let slim = graph.get("me", Options::new().set("fields", vec!["id", "first_name"]))?;
//!     println!("{:?}", slim.as_json());
//!
//!     // Every page of a feed, one request per pull.
//!     for page in graph.get_paged("me/posts", Options::new().set("limit", 25)) {
//!         println!("{:?}", page?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client façade and builder |
//! | [`options`] | Request option model and normalization |
//! | [`parse`] | Response body parsing into the payload variant |
//! | [`paging`] | Lazy page iteration |
//! | [`batch`] | Batch requests and positional response demultiplexing |
//! | [`transport`] | Blocking HTTP transport |
//! | [`signed_request`] | Signed request envelopes |

pub mod batch;
pub mod client;
pub mod error;
pub mod options;
pub mod paging;
pub mod parse;
pub mod signed_request;
pub mod transport;

// Re-export main types for convenience
pub use batch::{BatchRequest, BatchResponses};
pub use client::{GraphClient, GraphClientBuilder, SEARCH_TYPES};
pub use error::{Error, GraphError, GraphErrorKind};
pub use options::{Options, ParamValue, Upload};
pub use paging::Pages;
pub use parse::{parse, Payload};
pub use signed_request::SignedRequest;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
