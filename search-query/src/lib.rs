//! # Search Query
//!
//! Builders for query-DSL fragments sent to Elasticsearch/OpenSearch.
//!
//! Each query builder accumulates optional parameters and renders them with
//! [`Query::source`] into a `serde_json::Value` that only contains what was
//! set. Encoding the value and sending it is left to the transport layer.
//!
//! ## Modules
//!
//! - [`more_like_this`]: similarity query driven by text, ids or documents
//! - [`fetch_source`]: `_source` filtering for referenced documents
//! - [`config`]: environment-driven defaults for query parameters
//! - [`errors`]: error type of the strict entry points

pub mod config;
pub mod errors;
pub mod fetch_source;
pub mod more_like_this;
pub mod query;

pub use config::MoreLikeThisDefaults;
pub use errors::QueryError;
pub use fetch_source::FetchSourceContext;
pub use more_like_this::{MoreLikeThisQuery, MoreLikeThisQueryItem, MORE_LIKE_THIS_KEY};
pub use query::Query;
