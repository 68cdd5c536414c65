use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One organic result as returned by the search provider.
///
/// The record is held verbatim so it serialises back exactly as received.
/// Only the snippet is read, and anything that is not a string reads as
/// an empty snippet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult {
    pub fields: Map<String, Value>,
}

impl SearchResult {
    pub fn with_snippet(snippet: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("snippet".to_string(), Value::String(snippet.into()));
        SearchResult { fields }
    }

    pub fn snippet_text(&self) -> &str {
        self.fields
            .get("snippet")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}
