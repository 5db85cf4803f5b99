//! Extraction strategies
//!
//! Turn a raw response body into records (or a single answer). Each skill
//! binds one strategy; the orchestrator only sees [`ExtractionStrategy`].

pub mod answer;
pub mod field_map;
pub mod selector;

pub use answer::AnswerStrategy;
pub use field_map::FieldMapStrategy;
pub use selector::SelectorStrategy;

use crate::error::Result;
use crate::types::Extraction;

/// How a response body becomes structured output
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    /// CSS selectors over an HTML document
    Selector(SelectorStrategy),
    /// JSON pointers over an API item list
    FieldMap(FieldMapStrategy),
    /// Single free-text answer with citations
    Answer(AnswerStrategy),
}

impl ExtractionStrategy {
    /// Apply the strategy to a response body
    ///
    /// Zero matches is a valid, empty outcome. Only the answer strategy
    /// fails on a missing payload.
    pub fn extract(&self, body: &str) -> Result<Extraction> {
        match self {
            Self::Selector(strategy) => Ok(Extraction::Records(strategy.extract(body))),
            Self::FieldMap(strategy) => strategy.extract(body).map(Extraction::Records),
            Self::Answer(strategy) => strategy.extract(body).map(Extraction::Answer),
        }
    }
}

impl From<SelectorStrategy> for ExtractionStrategy {
    fn from(strategy: SelectorStrategy) -> Self {
        Self::Selector(strategy)
    }
}

impl From<FieldMapStrategy> for ExtractionStrategy {
    fn from(strategy: FieldMapStrategy) -> Self {
        Self::FieldMap(strategy)
    }
}

impl From<AnswerStrategy> for ExtractionStrategy {
    fn from(strategy: AnswerStrategy) -> Self {
        Self::Answer(strategy)
    }
}
