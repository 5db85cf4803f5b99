//! Core data types for skillpipe
//!
//! Contains the values that flow through a single pipeline invocation.

use std::path::PathBuf;

use reqwest::Method;
use serde::{Deserialize, Serialize};

/// How a request is sent: method, extra headers and optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

/// A fully built remote request for one skill invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionRequest {
    /// Query text or URL the user supplied
    pub target: String,
    /// Endpoint the request is sent to
    pub url: String,
    pub transport: TransportConfig,
}

impl AcquisitionRequest {
    /// Plain GET of `url` on behalf of `target`
    pub fn get(target: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            url: url.into(),
            transport: TransportConfig::default(),
        }
    }

    /// POST of a JSON body to `url` on behalf of `target`
    pub fn post_json(
        target: impl Into<String>,
        url: impl Into<String>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            target: target.into(),
            url: url.into(),
            transport: TransportConfig {
                method: Method::POST,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: Some(body),
            },
        }
    }

    /// Add a request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.transport.headers.push((name.into(), value.into()));
        self
    }
}

/// Successful response held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// URL after all redirects were followed
    pub final_url: String,
    pub status: u16,
    pub body: String,
}

/// A single extracted item (search hit, repository, video, citation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub url: String,

    /// Empty string when the provider has no description
    #[serde(default)]
    pub description: String,

    /// Star count, for repository hosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
}

impl Record {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: String::new(),
            stars: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stars = Some(stars);
        self
    }
}

/// URL citation attached to a free-text answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub title: String,
}

/// Free-text answer from a chat/response provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,

    /// Provider-side id usable to continue the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

/// Output of an extraction strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Records(Vec<Record>),
    Answer(Answer),
}

/// Rendered text bound to the path it will be written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub content: String,
    pub output_path: PathBuf,
}

/// Uniform result every skill returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    /// Extracted records; for answer skills, one per citation
    pub records: Vec<Record>,
    /// Present only for chat/response skills
    pub answer: Option<Answer>,
    pub output_file: PathBuf,
}

impl From<&Citation> for Record {
    fn from(citation: &Citation) -> Self {
        Record::new(&citation.title, &citation.url)
    }
}
