//! The more-like-this query builder.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::item::{non_empty, MoreLikeThisQueryItem};
use crate::config::MoreLikeThisDefaults;
use crate::errors::QueryError;
use crate::query::Query;

/// Key under which the query parameters are emitted.
pub const MORE_LIKE_THIS_KEY: &str = "mlt";

/// Finds documents that are "like" a given text, a set of document ids, or a
/// set of [`MoreLikeThisQueryItem`]s.
///
/// Every parameter is optional and only emitted when set. Numeric and boolean
/// parameters keep the difference between "unset" and zero/false, so
/// `min_term_freq(0)` is sent as `"min_term_freq": 0`.
///
/// A query with no like text, no ids and no docs is not rejected by
/// [`source`](Query::source); it renders as `{"mlt": {}}` and is left for the
/// server to refuse. Use [`validate`](Self::validate) or
/// [`try_source`](Self::try_source) to catch it locally.
///
/// # Example
///
/// ```
/// use search_query::{MoreLikeThisQuery, Query};
/// use serde_json::json;
///
/// let query = MoreLikeThisQuery::new("knowledge graph indexing")
///     .fields(["name", "description"])
///     .min_term_freq(1)
///     .percent_terms_to_match(0.3);
///
/// assert_eq!(
///     query.source(),
///     json!({
///         "mlt": {
///             "fields": ["name", "description"],
///             "like_text": "knowledge graph indexing",
///             "min_term_freq": 1,
///             "minimum_should_match": "30%"
///         }
///     })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoreLikeThisQuery {
    fields: Vec<String>,
    like_text: Option<String>,
    ids: Vec<String>,
    docs: Vec<MoreLikeThisQueryItem>,
    include: Option<bool>,
    minimum_should_match: Option<String>,
    min_term_freq: Option<i64>,
    max_query_terms: Option<i64>,
    stop_words: Vec<String>,
    min_doc_freq: Option<i64>,
    max_doc_freq: Option<i64>,
    min_word_len: Option<i64>,
    max_word_len: Option<i64>,
    boost_terms: Option<f64>,
    boost: Option<f64>,
    analyzer: Option<String>,
    fail_on_unsupported_field: Option<bool>,
    query_name: Option<String>,
}

impl MoreLikeThisQuery {
    /// Create a query that likes the given text. An empty string leaves the
    /// like text unset.
    pub fn new(like_text: impl Into<String>) -> Self {
        Self::default().like_text(like_text)
    }

    /// Add one field to run the query against.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add several fields to run the query against.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add one word that is never selected as a term.
    pub fn stop_word(mut self, stop_word: impl Into<String>) -> Self {
        self.stop_words.push(stop_word.into());
        self
    }

    /// Add several words that are never selected as terms.
    ///
    /// Stop words are ignored even if the analyzer would keep them.
    pub fn stop_words<I, S>(mut self, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(stop_words.into_iter().map(Into::into));
        self
    }

    /// Text to find similar documents for. Replaces any previous text.
    pub fn like_text(mut self, like_text: impl Into<String>) -> Self {
        self.like_text = Some(like_text.into());
        self
    }

    /// Add one item to find similar documents for.
    pub fn doc(mut self, doc: MoreLikeThisQueryItem) -> Self {
        self.docs.push(doc);
        self
    }

    /// Add several items to find similar documents for.
    pub fn docs<I>(mut self, docs: I) -> Self
    where
        I: IntoIterator<Item = MoreLikeThisQueryItem>,
    {
        self.docs.extend(docs);
        self
    }

    /// Add one document id to find similar documents for.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    /// Add several document ids to find similar documents for.
    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Whether the input documents are returned with the results.
    ///
    /// Sent inverted, as `exclude`.
    pub fn include(mut self, include: bool) -> Self {
        self.include = Some(include);
        self
    }

    /// Fraction of terms that must match, e.g. `0.42` becomes `"42%"`.
    ///
    /// Shares its value with [`minimum_should_match`](Self::minimum_should_match);
    /// whichever is called last wins.
    ///
    /// The floored percentage saturates at the `i64` range and NaN becomes
    /// `"0%"`; inputs outside `0.0..=1.0` are passed through as given.
    pub fn percent_terms_to_match(mut self, percent_terms_to_match: f64) -> Self {
        if !(0.0..=1.0).contains(&percent_terms_to_match) {
            debug!(
                percent_terms_to_match,
                "percent_terms_to_match outside 0.0..=1.0"
            );
        }
        let percent = (percent_terms_to_match * 100.0).floor() as i64;
        self.minimum_should_match = Some(format!("{}%", percent));
        self
    }

    /// Number of generated terms that must match, in minimum-should-match
    /// syntax (e.g. `"30%"`, `"3"`, `"-25%"`).
    pub fn minimum_should_match(mut self, minimum_should_match: impl Into<String>) -> Self {
        self.minimum_should_match = Some(minimum_should_match.into());
        self
    }

    /// Terms appearing fewer times than this in the input are ignored.
    pub fn min_term_freq(mut self, min_term_freq: i64) -> Self {
        self.min_term_freq = Some(min_term_freq);
        self
    }

    /// Maximum number of terms selected from the input.
    pub fn max_query_terms(mut self, max_query_terms: i64) -> Self {
        self.max_query_terms = Some(max_query_terms);
        self
    }

    /// Terms appearing in fewer documents than this are ignored.
    pub fn min_doc_freq(mut self, min_doc_freq: i64) -> Self {
        self.min_doc_freq = Some(min_doc_freq);
        self
    }

    /// Terms appearing in more documents than this are ignored.
    pub fn max_doc_freq(mut self, max_doc_freq: i64) -> Self {
        self.max_doc_freq = Some(max_doc_freq);
        self
    }

    /// Words shorter than this are ignored.
    pub fn min_word_len(mut self, min_word_len: i64) -> Self {
        self.min_word_len = Some(min_word_len);
        self
    }

    /// Words longer than this are ignored.
    pub fn max_word_len(mut self, max_word_len: i64) -> Self {
        self.max_word_len = Some(max_word_len);
        self
    }

    /// Boost factor applied to the selected terms.
    pub fn boost_terms(mut self, boost_terms: f64) -> Self {
        self.boost_terms = Some(boost_terms);
        self
    }

    /// Boost of the whole query.
    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Analyzer used on the input text. Defaults to the field's analyzer.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Whether the server fails or skips when a field does not support the
    /// query (e.g. numeric or binary fields).
    pub fn fail_on_unsupported_field(mut self, fail: bool) -> Self {
        self.fail_on_unsupported_field = Some(fail);
        self
    }

    /// Name reported in `matched_queries` of each hit.
    pub fn query_name(mut self, query_name: impl Into<String>) -> Self {
        self.query_name = Some(query_name.into());
        self
    }

    /// Fill every parameter that is still unset from `defaults`.
    ///
    /// Stop words are taken from the defaults only when the query has none.
    pub fn with_defaults(mut self, defaults: &MoreLikeThisDefaults) -> Self {
        fill(&mut self.min_term_freq, defaults.min_term_freq);
        fill(&mut self.max_query_terms, defaults.max_query_terms);
        fill(&mut self.min_doc_freq, defaults.min_doc_freq);
        fill(&mut self.max_doc_freq, defaults.max_doc_freq);
        fill(&mut self.min_word_len, defaults.min_word_len);
        fill(&mut self.max_word_len, defaults.max_word_len);
        fill(&mut self.boost_terms, defaults.boost_terms);
        if non_empty(&self.minimum_should_match).is_none()
            && defaults.minimum_should_match.is_some()
        {
            self.minimum_should_match = defaults.minimum_should_match.clone();
        }
        if non_empty(&self.analyzer).is_none() && defaults.analyzer.is_some() {
            self.analyzer = defaults.analyzer.clone();
        }
        if self.stop_words.is_empty() {
            self.stop_words = defaults.stop_words.clone();
        }
        self
    }

    /// Whether the query has something to be "like": text, ids or docs.
    pub fn has_likes(&self) -> bool {
        non_empty(&self.like_text).is_some() || !self.ids.is_empty() || !self.docs.is_empty()
    }

    /// Check the query locally instead of leaving it to the server.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the query can be sent
    /// * `Err(QueryError)` - If there is nothing to be "liked", or a boost is
    ///   NaN or infinite
    pub fn validate(&self) -> Result<(), QueryError> {
        if !self.has_likes() {
            return Err(QueryError::validation(
                "more_like_this requires like text, ids or docs",
            ));
        }
        for (name, value) in [("boost_terms", self.boost_terms), ("boost", self.boost)] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(QueryError::validation(format!(
                    "{} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Like [`source`](Query::source), but fails on a query that does not
    /// pass [`validate`](Self::validate).
    pub fn try_source(&self) -> Result<Value, QueryError> {
        self.validate()?;
        Ok(self.source())
    }

    /// Render the validated query fragment as a JSON string.
    pub fn to_json_string(&self) -> Result<String, QueryError> {
        Ok(serde_json::to_string(&self.try_source()?)?)
    }

    fn params(&self) -> Map<String, Value> {
        let mut params = Map::new();

        if !self.fields.is_empty() {
            params.insert("fields".to_string(), Value::from(self.fields.clone()));
        }
        if let Some(like_text) = non_empty(&self.like_text) {
            params.insert("like_text".to_string(), Value::from(like_text));
        }
        if let Some(msm) = non_empty(&self.minimum_should_match) {
            params.insert("minimum_should_match".to_string(), Value::from(msm));
        }
        if let Some(min_term_freq) = self.min_term_freq {
            params.insert("min_term_freq".to_string(), Value::from(min_term_freq));
        }
        if let Some(max_query_terms) = self.max_query_terms {
            params.insert("max_query_terms".to_string(), Value::from(max_query_terms));
        }
        if !self.stop_words.is_empty() {
            params.insert(
                "stop_words".to_string(),
                Value::from(self.stop_words.clone()),
            );
        }
        if let Some(min_doc_freq) = self.min_doc_freq {
            params.insert("min_doc_freq".to_string(), Value::from(min_doc_freq));
        }
        if let Some(max_doc_freq) = self.max_doc_freq {
            params.insert("max_doc_freq".to_string(), Value::from(max_doc_freq));
        }
        if let Some(min_word_len) = self.min_word_len {
            params.insert("min_word_len".to_string(), Value::from(min_word_len));
        }
        if let Some(max_word_len) = self.max_word_len {
            params.insert("max_word_len".to_string(), Value::from(max_word_len));
        }
        // JSON has no NaN or infinity; such boosts are dropped, not sent as null
        for (name, value) in [("boost_terms", self.boost_terms), ("boost", self.boost)] {
            match value {
                Some(value) if value.is_finite() => {
                    params.insert(name.to_string(), Value::from(value));
                }
                Some(value) => debug!(param = name, value, "Dropping non-finite boost"),
                None => {}
            }
        }
        if let Some(analyzer) = non_empty(&self.analyzer) {
            params.insert("analyzer".to_string(), Value::from(analyzer));
        }
        if let Some(fail) = self.fail_on_unsupported_field {
            params.insert("fail_on_unsupported_field".to_string(), Value::from(fail));
        }
        if let Some(query_name) = non_empty(&self.query_name) {
            params.insert("_name".to_string(), Value::from(query_name));
        }
        if !self.ids.is_empty() {
            params.insert("ids".to_string(), Value::from(self.ids.clone()));
        }
        if !self.docs.is_empty() {
            let docs = self.docs.iter().map(MoreLikeThisQueryItem::source).collect();
            params.insert("docs".to_string(), Value::Array(docs));
        }
        // The wire format only knows `exclude`
        if let Some(include) = self.include {
            params.insert("exclude".to_string(), Value::from(!include));
        }

        params
    }
}

impl Query for MoreLikeThisQuery {
    fn source(&self) -> Value {
        let params = if self.has_likes() {
            self.params()
        } else {
            debug!("more_like_this query has nothing to like, emitting empty parameters");
            Map::new()
        };

        let mut source = Map::new();
        source.insert(MORE_LIKE_THIS_KEY.to_string(), Value::Object(params));
        Value::Object(source)
    }
}

impl Serialize for MoreLikeThisQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.source().serialize(serializer)
    }
}

fn fill<T>(slot: &mut Option<T>, default: Option<T>) {
    if slot.is_none() {
        *slot = default;
    }
}
