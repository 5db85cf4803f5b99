//! Stream a remote resource straight to disk

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::client::SkillClient;
use crate::error::{Result, SkillError};
use crate::slug;

/// Directory used when no explicit output path is given
pub const DEFAULT_DOWNLOAD_DIR: &str = "download";

/// Result of a completed download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    /// URL as requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    pub bytes: u64,
    pub output_file: PathBuf,
}

/// Download `url` into `output`, or into `download/<slug>` when `output` is
/// `None`
///
/// The body is never held in memory as a whole. Redirects follow the
/// client's budget; `deadline` overrides the client's timeout.
///
/// # Errors
/// - `InvalidInput` for an empty URL
/// - `InvalidUrl`, `HttpStatus`, `TooManyRedirects`, `Timeout` from the fetch
/// - `Io` if the file cannot be written
#[instrument(skip(client, output, deadline))]
pub async fn download(
    client: &SkillClient,
    url: &str,
    output: Option<&Path>,
    deadline: Option<Duration>,
) -> Result<DownloadResult> {
    download_into(client, url, Path::new(DEFAULT_DOWNLOAD_DIR), output, deadline).await
}

/// Same as [`download`] with a custom default directory
pub async fn download_into(
    client: &SkillClient,
    url: &str,
    base_dir: &Path,
    output: Option<&Path>,
    deadline: Option<Duration>,
) -> Result<DownloadResult> {
    let url = url.trim();
    if url.is_empty() {
        return Err(SkillError::InvalidInput("url cannot be empty".to_string()));
    }

    let output_file = slug::resolve(url, base_dir, output, "").await?;

    let streamed = client
        .download_to_file(url, &output_file, client.max_redirects(), deadline)
        .await
        .inspect_err(|e| warn!(%url, error = %e, "download failed"))?;

    info!(
        %url,
        final_url = %streamed.final_url,
        bytes = streamed.bytes,
        output = %output_file.display(),
        "download complete"
    );

    Ok(DownloadResult {
        url: url.to_string(),
        final_url: streamed.final_url,
        status: streamed.status,
        bytes: streamed.bytes,
        output_file,
    })
}
