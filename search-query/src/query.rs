//! The common contract of every query builder.

use serde_json::Value;

/// A query that can render itself as a query-DSL fragment.
///
/// Implementations return the fragment wrapped in its query-type key
/// (e.g. `{"mlt": {...}}`), ready to be embedded under `"query"` in a
/// search request body.
pub trait Query {
    /// Build the query-DSL fragment for this query.
    fn source(&self) -> Value;
}
