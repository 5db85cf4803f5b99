//! skillpipe Core Library
//!
//! Provides the acquisition pipeline behind the `skillpipe` skills: fetch a
//! remote resource, extract records or an answer from it, render Markdown and
//! persist the artifact at a path derived from the input.
//!
//! # Overview
//!
//! - [`SkillClient`]: HTTP client with a bounded, manually followed redirect
//!   chain and a deadline on every operation
//! - [`ExtractionStrategy`]: CSS selectors, JSON field mapping or a single
//!   answer with citations
//! - [`Pipeline`]: drives any [`Skill`] from input to file
//! - [`download()`] and [`Mailbox`]: skills that do not render Markdown
//!
//! # Example
//!
//! ```no_run
//! use skillpipe_core::{GitHubSearch, Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let pipeline = Pipeline::new()?;
//!
//!     let result = pipeline.run(&GitHubSearch::new(), "utility libs", None).await?;
//!
//!     for record in &result.records {
//!         println!("{}: {}", record.title, record.url);
//!     }
//!     println!("Saved to {}", result.output_file.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Output paths
//!
//! Without an explicit path each skill writes to `<skill-dir>/<slug><suffix>`,
//! e.g. `search-bing/openai-codex.md`. Inputs with the same slug share a file;
//! the last run wins.

mod client;
mod download;
mod error;
pub mod extract;
mod mailbox;
mod pipeline;
pub mod render;
pub mod skills;
pub mod slug;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, DEFAULT_REDIRECT_BUDGET, SkillClient, StreamedBody, mask_secret, redact_url};

// Re-export error types
pub use error::{Result, SkillError};

// Re-export extraction strategies
pub use extract::{AnswerStrategy, ExtractionStrategy, FieldMapStrategy, SelectorStrategy};

// Re-export the orchestrator and the providers it drives
pub use pipeline::{Pipeline, Stage, write_artifact};
pub use skills::{
    BingSearch, GitHubSearch, OpenAiConfig, OpenAiResponse, OpenAiSearch, Skill, YouTubeApiSearch,
    YouTubeSearch,
};

// Re-export standalone skills
pub use download::{DEFAULT_DOWNLOAD_DIR, DownloadResult, download, download_into};
pub use mailbox::{
    Account, Delivery, Inbox, MailConfig, MailTransport, Mailbox, Outgoing, Registration,
    SendReceipt, SmtpRelay,
};

// Re-export data types
pub use types::{
    AcquisitionRequest, Answer, Citation, Extraction, FetchResult, PipelineResult, Record,
    RenderedArtifact, TransportConfig,
};
