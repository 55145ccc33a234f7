//! A single document or text used as a "like" seed of a more-like-this query.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::QueryError;
use crate::fetch_source::FetchSourceContext;

/// One item to be "liked" by a [`MoreLikeThisQuery`](super::MoreLikeThisQuery).
///
/// An item is either free text (see [`like_text`](Self::like_text)) or a
/// reference to a document, given by index/type/id or as an inline `doc`.
/// Free text takes precedence: once set, every other attribute is ignored
/// when the item is serialized.
///
/// # Example
///
/// ```
/// use search_query::MoreLikeThisQueryItem;
/// use serde_json::json;
///
/// let item = MoreLikeThisQueryItem::new()
///     .index("entities")
///     .id("42")
///     .version(0);
///
/// assert_eq!(
///     item.source(),
///     json!({ "_index": "entities", "_id": "42", "_version": 0 })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoreLikeThisQueryItem {
    like_text: Option<String>,
    index: Option<String>,
    doc_type: Option<String>,
    id: Option<String>,
    doc: Option<Value>,
    fields: Vec<String>,
    routing: Option<String>,
    fetch_source: Option<FetchSourceContext>,
    version: Option<i64>,
    version_type: Option<String>,
}

impl MoreLikeThisQueryItem {
    /// Create an empty item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text to be "liked". Overrides every other attribute of the item.
    pub fn like_text(mut self, like_text: impl Into<String>) -> Self {
        self.like_text = Some(like_text.into());
        self
    }

    /// Index of the referenced document.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Mapping type of the referenced document.
    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Id of the referenced document.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Inline document used instead of a stored one. `null` leaves it unset.
    pub fn doc(mut self, doc: impl Into<Value>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Inline document from any serializable value.
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - The item with the document attached
    /// * `Err(QueryError)` - If the value cannot be represented as JSON
    pub fn try_doc<T: Serialize>(mut self, doc: &T) -> Result<Self, QueryError> {
        self.doc = Some(serde_json::to_value(doc)?);
        Ok(self)
    }

    /// Add one field the item is compared on.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add several fields the item is compared on.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Routing key of the referenced document.
    pub fn routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    /// Controls if and how `_source` of the referenced document is loaded.
    pub fn fetch_source_context(mut self, fetch_source: FetchSourceContext) -> Self {
        self.fetch_source = Some(fetch_source);
        self
    }

    /// Version of the referenced document. Negative values mean "unset".
    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    /// Version type of the referenced document (e.g. `"external"`).
    pub fn version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self
    }

    /// Build the item fragment: the bare like-text string, or an object of
    /// the attributes that are set.
    pub fn source(&self) -> Value {
        if let Some(like_text) = non_empty(&self.like_text) {
            return Value::String(like_text.to_string());
        }

        let mut source = Map::new();

        if let Some(index) = non_empty(&self.index) {
            source.insert("_index".to_string(), Value::from(index));
        }
        if let Some(doc_type) = non_empty(&self.doc_type) {
            source.insert("_type".to_string(), Value::from(doc_type));
        }
        if let Some(id) = non_empty(&self.id) {
            source.insert("_id".to_string(), Value::from(id));
        }
        if let Some(doc) = self.doc.as_ref().filter(|d| !d.is_null()) {
            source.insert("doc".to_string(), doc.clone());
        }
        if !self.fields.is_empty() {
            source.insert("fields".to_string(), Value::from(self.fields.clone()));
        }
        if let Some(routing) = non_empty(&self.routing) {
            source.insert("_routing".to_string(), Value::from(routing));
        }
        if let Some(ref fetch_source) = self.fetch_source {
            source.insert("_source".to_string(), fetch_source.source());
        }
        if let Some(version) = self.version.filter(|v| *v >= 0) {
            source.insert("_version".to_string(), Value::from(version));
        }
        if let Some(version_type) = non_empty(&self.version_type) {
            source.insert("_version_type".to_string(), Value::from(version_type));
        }

        Value::Object(source)
    }
}

impl Serialize for MoreLikeThisQueryItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.source().serialize(serializer)
    }
}

/// Empty strings are treated the same as unset ones.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_item() {
        assert_eq!(MoreLikeThisQueryItem::new().source(), json!({}));
    }

    #[test]
    fn test_like_text_short_circuits_other_attributes() {
        let item = MoreLikeThisQueryItem::new()
            .index("entities")
            .id("1")
            .version(3)
            .like_text("foo");
        assert_eq!(item.source(), json!("foo"));
    }

    #[test]
    fn test_empty_like_text_is_ignored() {
        let item = MoreLikeThisQueryItem::new().like_text("").id("1");
        assert_eq!(item.source(), json!({ "_id": "1" }));
    }

    #[test]
    fn test_full_reference() {
        let item = MoreLikeThisQueryItem::new()
            .index("entities")
            .doc_type("entity")
            .id("1")
            .field("name")
            .fields(["description"])
            .routing("space-a")
            .fetch_source_context(FetchSourceContext::new(false))
            .version(7)
            .version_type("external");

        assert_eq!(
            item.source(),
            json!({
                "_index": "entities",
                "_type": "entity",
                "_id": "1",
                "fields": ["name", "description"],
                "_routing": "space-a",
                "_source": false,
                "_version": 7,
                "_version_type": "external"
            })
        );
    }

    #[test]
    fn test_version_zero_is_emitted() {
        let item = MoreLikeThisQueryItem::new().version(0);
        assert_eq!(item.source(), json!({ "_version": 0 }));
    }

    #[test]
    fn test_negative_version_is_unset() {
        let item = MoreLikeThisQueryItem::new().id("1").version(-1);
        assert_eq!(item.source(), json!({ "_id": "1" }));
    }

    #[test]
    fn test_inline_doc() {
        let item = MoreLikeThisQueryItem::new()
            .index("entities")
            .doc(json!({ "name": "Geo", "description": "knowledge graph" }));
        assert_eq!(
            item.source(),
            json!({
                "_index": "entities",
                "doc": { "name": "Geo", "description": "knowledge graph" }
            })
        );
    }

    #[test]
    fn test_null_doc_is_unset() {
        let item = MoreLikeThisQueryItem::new().id("1").doc(Value::Null);
        assert_eq!(item.source(), json!({ "_id": "1" }));
    }

    #[test]
    fn test_try_doc_from_struct() {
        #[derive(Serialize)]
        struct Entity {
            name: &'static str,
        }

        let item = MoreLikeThisQueryItem::new()
            .try_doc(&Entity { name: "Geo" })
            .unwrap();
        assert_eq!(item.source(), json!({ "doc": { "name": "Geo" } }));
    }

    #[test]
    fn test_try_doc_rejects_non_string_map_keys() {
        let mut doc = std::collections::HashMap::new();
        doc.insert(vec![1u8], "value");

        let result = MoreLikeThisQueryItem::new().try_doc(&doc);
        assert!(matches!(
            result.unwrap_err(),
            QueryError::SerializationError(_)
        ));
    }

    #[test]
    fn test_serialize_delegates_to_source() {
        let item = MoreLikeThisQueryItem::new().id("1");
        assert_eq!(serde_json::to_value(&item).unwrap(), json!({ "_id": "1" }));
    }
}
