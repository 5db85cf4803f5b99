//! Single-answer extraction for chat/response APIs

use serde_json::Value;

use crate::error::{Result, SkillError};
use crate::types::{Answer, Citation};

const URL_CITATION: &str = "url_citation";

/// Reads one answer text plus its URL citations from a JSON payload
#[derive(Debug, Clone)]
pub struct AnswerStrategy {
    text: String,
    annotations: Option<String>,
    response_id: Option<String>,
}

impl AnswerStrategy {
    /// Answer text is the string at the `text` pointer
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: None,
            response_id: None,
        }
    }

    /// Pointer to the annotation array carrying citations
    pub fn annotations(mut self, pointer: impl Into<String>) -> Self {
        self.annotations = Some(pointer.into());
        self
    }

    /// Pointer to the provider's response id
    pub fn response_id(mut self, pointer: impl Into<String>) -> Self {
        self.response_id = Some(pointer.into());
        self
    }

    /// Parse `body` and extract the answer
    ///
    /// # Errors
    /// - `Json` if the body is not JSON
    /// - `MissingPayload` if there is no non-empty answer text
    pub fn extract(&self, body: &str) -> Result<Answer> {
        let document: Value = serde_json::from_str(body)?;

        let text = document
            .pointer(&self.text)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                SkillError::MissingPayload(format!("no answer text at {}", self.text))
            })?
            .to_string();

        let citations: Vec<Citation> = self
            .annotations
            .as_deref()
            .and_then(|pointer| document.pointer(pointer))
            .and_then(Value::as_array)
            .map(|annotations| annotations.iter().filter_map(citation).collect())
            .unwrap_or_default();

        let response_id = self
            .response_id
            .as_deref()
            .and_then(|pointer| document.pointer(pointer))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Answer {
            text,
            citations,
            response_id,
        })
    }
}

/// Citation from a `url_citation` annotation
///
/// Chat Completions nests the fields under `url_citation`, the Responses
/// API puts them on the annotation itself; both are accepted.
fn citation(annotation: &Value) -> Option<Citation> {
    if annotation.get("type").and_then(Value::as_str) != Some(URL_CITATION) {
        return None;
    }

    let fields = annotation.get(URL_CITATION).unwrap_or(annotation);
    let url = fields.get("url").and_then(Value::as_str)?.to_string();
    let title = fields
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(Citation { url, title })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_strategy() -> AnswerStrategy {
        AnswerStrategy::new("/choices/0/message/content")
            .annotations("/choices/0/message/annotations")
    }

    #[test]
    fn test_extract_chat_answer_with_citations() {
        let body = r#"{
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "  Rust 1.85 stabilized the 2024 edition.  ",
                    "annotations": [
                        {"type": "url_citation",
                         "url_citation": {"url": "https://blog.rust-lang.org", "title": "Rust Blog"}},
                        {"type": "file_citation", "file_id": "f1"}
                    ]
                }
            }]
        }"#;

        let answer = chat_strategy().extract(body).unwrap();
        assert_eq!(answer.text, "Rust 1.85 stabilized the 2024 edition.");
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(answer.citations[0].url, "https://blog.rust-lang.org");
        assert_eq!(answer.citations[0].title, "Rust Blog");
        assert_eq!(answer.response_id, None);
    }

    #[test]
    fn test_extract_flat_citations_and_response_id() {
        let strategy = AnswerStrategy::new("/output/0/content/0/text")
            .annotations("/output/0/content/0/annotations")
            .response_id("/id");

        let body = r#"{
            "id": "resp_123",
            "output": [{"content": [{
                "type": "output_text",
                "text": "Answer",
                "annotations": [{"type": "url_citation", "url": "https://example.com", "title": "Example"}]
            }]}]
        }"#;

        let answer = strategy.extract(body).unwrap();
        assert_eq!(answer.text, "Answer");
        assert_eq!(answer.citations[0].url, "https://example.com");
        assert_eq!(answer.response_id.as_deref(), Some("resp_123"));
    }

    #[test]
    fn test_missing_answer_is_missing_payload() {
        let result = chat_strategy().extract(r#"{"choices": []}"#);
        assert!(matches!(result, Err(SkillError::MissingPayload(_))));

        let result = chat_strategy().extract(r#"{"choices": [{"message": {"content": ""}}]}"#);
        assert!(matches!(result, Err(SkillError::MissingPayload(_))));
    }

    #[test]
    fn test_answer_without_annotations() {
        let answer = chat_strategy()
            .extract(r#"{"choices": [{"message": {"content": "plain"}}]}"#)
            .unwrap();
        assert!(answer.citations.is_empty());
    }
}
