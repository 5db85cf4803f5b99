//! HTTP client with bounded redirect following
//!
//! Redirects are never followed by reqwest itself; [`SkillClient`] walks the
//! chain manually so the hop budget is enforced even for cyclic chains, and
//! every operation runs under a deadline so a hung transport cannot stall
//! the caller.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::{Method, StatusCode, Url};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::{Result, SkillError};
use crate::types::{AcquisitionRequest, FetchResult, TransportConfig};

/// Number of redirects followed before giving up
pub const DEFAULT_REDIRECT_BUDGET: u32 = 5;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for a whole operation, body transfer included (default: 30)
    pub timeout_secs: u64,
    /// Connection establishment timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,
    /// Redirect hop budget (default: 5)
    pub max_redirects: u32,
    /// Default User-Agent, individual requests may override it
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: DEFAULT_REDIRECT_BUDGET,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Outcome of a body streamed into a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedBody {
    pub final_url: String,
    pub status: u16,
    /// Bytes written to the sink
    pub bytes: u64,
}

/// HTTP client wrapper used by every skill
pub struct SkillClient {
    client: reqwest::Client,
    timeout: Duration,
    max_redirects: u32,
}

impl SkillClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            max_redirects: config.max_redirects,
        })
    }

    /// Deadline applied to each operation
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Redirect budget applied by [`execute`](Self::execute)
    pub fn max_redirects(&self) -> u32 {
        self.max_redirects
    }

    /// Send a request and hold the successful body in memory
    ///
    /// # Errors
    /// - `InvalidUrl` - malformed URL or non-http(s) scheme
    /// - `TooManyRedirects` - redirect budget exhausted
    /// - `HttpStatus` - terminal response was not 2xx
    /// - `Timeout` - deadline elapsed
    pub async fn execute(&self, request: &AcquisitionRequest) -> Result<FetchResult> {
        self.within(self.timeout, async {
            let response = self
                .send_following_redirects(&request.url, &request.transport, self.max_redirects)
                .await?;

            let final_url = response.url().to_string();
            let status = response.status().as_u16();
            let body = response.text().await?;

            Ok(FetchResult {
                final_url,
                status,
                body,
            })
        })
        .await
    }

    /// GET `url` and stream the body into `sink`
    ///
    /// Each chunk is written before the next one is read, so memory use stays
    /// bounded by the chunk size regardless of the payload size.
    pub async fn fetch_into<W>(
        &self,
        url: &str,
        sink: &mut W,
        redirect_budget: u32,
    ) -> Result<StreamedBody>
    where
        W: AsyncWrite + Unpin,
    {
        self.within(self.timeout, async {
            let response = self
                .send_following_redirects(url, &TransportConfig::default(), redirect_budget)
                .await?;
            copy_body(response, sink, Path::new("<stream>")).await
        })
        .await
    }

    /// GET `url` and stream the body to the file at `path`
    ///
    /// Parent directories are created as needed. The file is only created
    /// once a successful response has arrived; a failure mid-transfer may
    /// leave a truncated file behind.
    ///
    /// `deadline` overrides the configured timeout for this transfer.
    pub async fn download_to_file(
        &self,
        url: &str,
        path: &Path,
        redirect_budget: u32,
        deadline: Option<Duration>,
    ) -> Result<StreamedBody> {
        self.within(deadline.unwrap_or(self.timeout), async {
            let response = self
                .send_following_redirects(url, &TransportConfig::default(), redirect_budget)
                .await?;

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SkillError::io(parent, e))?;
            }
            let mut file = File::create(path)
                .await
                .map_err(|e| SkillError::io(path, e))?;

            copy_body(response, &mut file, path).await
        })
        .await
    }

    /// Issue the request, following redirects while the budget lasts
    ///
    /// Returns the terminal 2xx response with its body still unread.
    async fn send_following_redirects(
        &self,
        url: &str,
        transport: &TransportConfig,
        budget: u32,
    ) -> Result<reqwest::Response> {
        let mut current = parse_http_url(url)?;
        let mut method = transport.method.clone();
        let mut body = transport.body.clone();
        let mut remaining = budget;

        loop {
            log_request(&method, &current, &transport.headers);

            let mut builder = self.client.request(method.clone(), current.clone());
            for (name, value) in &transport.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(json) = &body {
                builder = builder.json(json);
            }

            let response = builder.send().await?;
            let status = response.status();

            let location = if status.is_redirection() {
                response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            } else {
                None
            };

            if let Some(location) = location {
                if remaining == 0 {
                    return Err(SkillError::TooManyRedirects { budget });
                }

                let next = current
                    .join(&location)
                    .map_err(|_| SkillError::InvalidUrl(location.clone()))?;
                check_scheme(&next)?;

                debug!(
                    from = %redact_url(&current),
                    to = %redact_url(&next),
                    status = status.as_u16(),
                    remaining,
                    "following redirect"
                );

                // 307/308 replay method and body, the others degrade to GET
                if status != StatusCode::TEMPORARY_REDIRECT
                    && status != StatusCode::PERMANENT_REDIRECT
                {
                    method = Method::GET;
                    body = None;
                }

                remaining -= 1;
                current = next;
                continue;
            }

            if !status.is_success() {
                let code = status.as_u16();
                // Reading the body releases the connection and keeps the
                // provider's error message around for diagnostics
                let body = response.text().await.ok().filter(|text| !text.is_empty());
                debug!(url = %redact_url(&current), code, "non-success response");
                return Err(SkillError::HttpStatus { code, body });
            }

            return Ok(response);
        }
    }

    async fn within<T, F>(&self, deadline: Duration, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(deadline, operation)
            .await
            .map_err(|_| SkillError::Timeout(deadline))?
    }
}

/// Copy a response body into `sink` chunk by chunk
async fn copy_body<W>(mut response: reqwest::Response, sink: &mut W, path: &Path) -> Result<StreamedBody>
where
    W: AsyncWrite + Unpin,
{
    let final_url = response.url().to_string();
    let status = response.status().as_u16();
    let mut bytes = 0u64;

    while let Some(chunk) = response.chunk().await? {
        sink.write_all(&chunk)
            .await
            .map_err(|e| SkillError::io(path, e))?;
        bytes += chunk.len() as u64;
    }
    sink.flush().await.map_err(|e| SkillError::io(path, e))?;

    Ok(StreamedBody {
        final_url,
        status,
        bytes,
    })
}

fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|_| SkillError::InvalidUrl(url.to_string()))?;
    check_scheme(&parsed)?;
    Ok(parsed)
}

fn check_scheme(url: &Url) -> Result<()> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(SkillError::InvalidUrl(url.to_string())),
    }
}

fn log_request(method: &Method, url: &Url, headers: &[(String, String)]) {
    let masked: Vec<(&str, String)> = headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                (name.as_str(), mask_secret(value, 5))
            } else {
                (name.as_str(), value.clone())
            }
        })
        .collect();
    debug!(%method, url = %redact_url(url), headers = ?masked, "sending request");
}

/// Query parameters that carry credentials
const SECRET_QUERY_KEYS: &[&str] = &["key", "api_key", "access_token", "token"];

/// Copy of `url` with credential query parameters masked, for logging
pub fn redact_url(url: &Url) -> String {
    if !url
        .query_pairs()
        .any(|(name, _)| SECRET_QUERY_KEYS.contains(&name.as_ref()))
    {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if SECRET_QUERY_KEYS.contains(&name.as_ref()) {
                mask_secret(&value, 3)
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// Mask a credential, keeping `keep` characters at each end
///
/// A `Bearer ` prefix is preserved. Values too short to mask meaningfully
/// are returned unchanged.
pub fn mask_secret(value: &str, keep: usize) -> String {
    const BEARER: &str = "Bearer ";

    if let Some(token) = value.strip_prefix(BEARER) {
        return format!("{}{}", BEARER, mask_secret(token, keep));
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= keep * 2 {
        return value.to_string();
    }

    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{}...{}", head, tail)
}
