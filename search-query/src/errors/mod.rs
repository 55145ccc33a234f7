//! Error types for the query builders.
//!
//! Building a query never fails; these errors are only produced by the strict
//! entry points (validation, typed documents, JSON rendering, env config).

mod query_error;

pub use query_error::QueryError;
