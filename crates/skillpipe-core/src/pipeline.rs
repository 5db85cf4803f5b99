//! Pipeline orchestrator
//!
//! Drives one skill invocation through
//! `Building → Fetching → Extracting → Rendering → Persisting → Done`.
//! Any stage may fail; the error is logged with the stage it happened in and
//! returned to the caller. Nothing is retried.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::client::{ClientConfig, SkillClient};
use crate::error::{Result, SkillError};
use crate::render::render;
use crate::skills::Skill;
use crate::slug;
use crate::types::{Extraction, PipelineResult, Record, RenderedArtifact};

/// Position of an invocation in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Building,
    Fetching,
    Extracting,
    Rendering,
    Persisting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Building => "building",
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Rendering => "rendering",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs skills against a shared HTTP client
pub struct Pipeline {
    client: SkillClient,
}

impl Pipeline {
    /// Create a pipeline with default client configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: SkillClient::new()?,
        })
    }

    /// Create a pipeline with custom client configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: SkillClient::with_config(config)?,
        })
    }

    /// Create a pipeline around an existing client
    pub fn with_client(client: SkillClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SkillClient {
        &self.client
    }

    /// Run `skill` for `input`, writing the artifact to `output` or to the
    /// skill's default location
    ///
    /// # Errors
    /// - `InvalidInput` if input is empty or whitespace only
    /// - `InvalidUrl`, `HttpStatus`, `TooManyRedirects`, `Timeout` while fetching
    /// - `Json`, `MissingPayload` while extracting
    /// - `Io` while persisting
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> skillpipe_core::Result<()> {
    /// use skillpipe_core::{BingSearch, Pipeline};
    /// let pipeline = Pipeline::new()?;
    /// let result = pipeline.run(&BingSearch::new()?, "openai codex", None).await?;
    /// println!("Saved {} results to {}", result.records.len(), result.output_file.display());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(skill = %skill.name()))]
    pub async fn run<S>(&self, skill: &S, input: &str, output: Option<&Path>) -> Result<PipelineResult>
    where
        S: Skill + ?Sized,
    {
        let mut stage = Stage::Building;
        let outcome = self.drive(skill, input, output, &mut stage).await;

        if let Err(e) = &outcome {
            warn!(%stage, error = %e, "pipeline failed");
        }
        outcome
    }

    async fn drive<S>(
        &self,
        skill: &S,
        input: &str,
        output: Option<&Path>,
        stage: &mut Stage,
    ) -> Result<PipelineResult>
    where
        S: Skill + ?Sized,
    {
        let target = input.trim();
        if target.is_empty() {
            return Err(SkillError::InvalidInput("input cannot be empty".to_string()));
        }

        let request = skill.request(target)?;
        let slug_source = if skill.lowercase_slug() {
            target.to_lowercase()
        } else {
            target.to_string()
        };
        let output_path =
            slug::resolve(&slug_source, skill.output_dir(), output, skill.suffix()).await?;

        advance(stage, Stage::Fetching);
        let fetched = self.client.execute(&request).await?;
        debug!(status = fetched.status, bytes = fetched.body.len(), "fetched");

        advance(stage, Stage::Extracting);
        let extraction = skill.strategy().extract(&fetched.body)?;

        advance(stage, Stage::Rendering);
        let artifact = RenderedArtifact {
            content: render(&skill.title(target), &extraction),
            output_path,
        };

        advance(stage, Stage::Persisting);
        artifact.persist().await?;

        advance(stage, Stage::Done);
        let result = into_result(extraction, artifact);
        info!(
            records = result.records.len(),
            output = %result.output_file.display(),
            "artifact written"
        );
        Ok(result)
    }
}

impl RenderedArtifact {
    /// Write the artifact, replacing any existing file
    pub async fn persist(&self) -> Result<()> {
        write_artifact(&self.output_path, self.content.as_bytes()).await
    }
}

/// Write `content` to `path`, creating parent directories as needed
///
/// The file is fully overwritten. A failed write may leave no file or a
/// truncated one.
pub async fn write_artifact(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SkillError::io(parent, e))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| SkillError::io(path, e))
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage transition");
    *stage = next;
}

fn into_result(extraction: Extraction, artifact: RenderedArtifact) -> PipelineResult {
    match extraction {
        Extraction::Records(records) => PipelineResult {
            records,
            answer: None,
            output_file: artifact.output_path,
        },
        Extraction::Answer(answer) => PipelineResult {
            records: answer.citations.iter().map(Record::from).collect(),
            answer: Some(answer),
            output_file: artifact.output_path,
        },
    }
}
