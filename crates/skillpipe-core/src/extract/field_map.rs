//! Field-mapping extraction over JSON API responses
//!
//! Fields are addressed with JSON pointers (RFC 6901), e.g. `/items` or
//! `/snippet/title`.

use serde_json::Value;

use crate::error::Result;
use crate::types::Record;

/// Maps each element of a JSON array onto a [`Record`]
#[derive(Debug, Clone)]
pub struct FieldMapStrategy {
    items: String,
    title: String,
    url: String,
    url_prefix: Option<String>,
    description: Option<String>,
    stars: Option<String>,
}

impl FieldMapStrategy {
    /// Map the array at `items`, reading `title` and `url` from each element
    pub fn new(items: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            items: items.into(),
            title: title.into(),
            url: url.into(),
            url_prefix: None,
            description: None,
            stars: None,
        }
    }

    /// Pointer to the description; absent values become `""`
    pub fn description(mut self, pointer: impl Into<String>) -> Self {
        self.description = Some(pointer.into());
        self
    }

    /// Pointer to a numeric star count
    pub fn stars(mut self, pointer: impl Into<String>) -> Self {
        self.stars = Some(pointer.into());
        self
    }

    /// Prepended to the value read from the url pointer (for bare ids)
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    /// Parse `body` as JSON and extract records
    ///
    /// # Errors
    /// Returns `Json` if the body is not valid JSON. A document without the
    /// item array yields an empty vector.
    pub fn extract(&self, body: &str) -> Result<Vec<Record>> {
        let document: Value = serde_json::from_str(body)?;
        Ok(self.extract_value(&document))
    }

    /// Extract records from an already parsed document
    pub fn extract_value(&self, document: &Value) -> Vec<Record> {
        let Some(items) = document.pointer(&self.items).and_then(Value::as_array) else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| self.extract_item(item))
            .collect()
    }

    fn extract_item(&self, item: &Value) -> Option<Record> {
        let title = string_at(item, &self.title)?;
        let url = string_at(item, &self.url)?;
        let url = match &self.url_prefix {
            Some(prefix) => format!("{}{}", prefix, url),
            None => url,
        };

        let description = self
            .description
            .as_deref()
            .and_then(|pointer| string_at(item, pointer))
            .unwrap_or_default();

        let mut record = Record::new(title, url).with_description(description);
        record.stars = self
            .stars
            .as_deref()
            .and_then(|pointer| item.pointer(pointer))
            .and_then(Value::as_u64);

        Some(record)
    }
}

/// Non-empty trimmed string at `pointer`
fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
