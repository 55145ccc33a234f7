//! Source filtering for fetched documents.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Controls if and how the `_source` of a document is returned.
///
/// When `fetch_source` is `false` the whole `_source` is suppressed and the
/// include/exclude patterns are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSourceContext {
    fetch_source: bool,
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl FetchSourceContext {
    /// Create a new context that either fetches or suppresses `_source`.
    pub fn new(fetch_source: bool) -> Self {
        Self {
            fetch_source,
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// Whether `_source` is fetched at all.
    pub fn fetch_source(&self) -> bool {
        self.fetch_source
    }

    /// Add one field pattern to return.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    /// Add several field patterns to return.
    pub fn includes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.includes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add one field pattern to leave out.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excludes.push(pattern.into());
        self
    }

    /// Add several field patterns to leave out.
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excludes.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Build the `_source` value: `false`, or the include/exclude object.
    pub fn source(&self) -> Value {
        if !self.fetch_source {
            return Value::Bool(false);
        }
        json!({
            "includes": self.includes,
            "excludes": self.excludes,
        })
    }
}

impl Default for FetchSourceContext {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Serialize for FetchSourceContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.source().serialize(serializer)
    }
}
