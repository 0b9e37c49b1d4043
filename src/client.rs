//! Graph API client façade.
//!
//! Keep the public surface small and predictable; implementation details
//! live in submodules under `src/client/`.

pub mod builder;
pub mod core;

pub use self::builder::GraphClientBuilder;
pub use self::core::{GraphClient, SEARCH_TYPES};
