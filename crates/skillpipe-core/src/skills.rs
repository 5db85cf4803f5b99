//! Provider skills
//!
//! Each provider differs only in how the request is built and which
//! extraction strategy reads the response. The orchestrator drives any
//! [`Skill`].

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::{Result, SkillError};
use crate::extract::{AnswerStrategy, ExtractionStrategy, FieldMapStrategy, SelectorStrategy};
use crate::types::AcquisitionRequest;
use crate::url::{
    BING_BASE_URL, GITHUB_API_URL, OPENAI_API_URL, YOUTUBE_API_URL, YOUTUBE_BASE_URL,
    build_bing_url, build_github_search_url, build_youtube_api_url, build_youtube_search_url,
    join_endpoint,
};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64)";
const API_USER_AGENT: &str = concat!("skillpipe/", env!("CARGO_PKG_VERSION"));

const CHAT_MODEL: &str = "gpt-4o-search-preview";
const RESPONSES_MODEL: &str = "gpt-4o-mini";
const CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant with web browsing capability.";

/// One provider variant of the acquisition pipeline
pub trait Skill: Send + Sync {
    /// Command name, e.g. `search-bing`
    fn name(&self) -> &str;

    /// Directory holding artifacts when no explicit path is given
    fn output_dir(&self) -> &Path;

    /// Artifact file suffix
    fn suffix(&self) -> &str {
        ".md"
    }

    /// Whether the input is lowercased before slugification
    fn lowercase_slug(&self) -> bool {
        false
    }

    /// Heading of the rendered artifact
    fn title(&self, input: &str) -> String;

    /// Build the remote request for `input`
    fn request(&self, input: &str) -> Result<AcquisitionRequest>;

    /// Strategy that reads the response
    fn strategy(&self) -> &ExtractionStrategy;
}

/// Builder methods shared by every provider
macro_rules! endpoint_builders {
    ($skill:ty) => {
        impl $skill {
            /// Send requests to `base_url` instead of the public endpoint
            pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
                self.base_url = base_url.into();
                self
            }

            /// Write default artifacts under `dir`
            pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
                self.output_dir = dir.into();
                self
            }
        }
    };
}

/// Web search through the Bing result page
pub struct BingSearch {
    base_url: String,
    output_dir: PathBuf,
    strategy: ExtractionStrategy,
}

impl BingSearch {
    pub fn new() -> Result<Self> {
        let strategy = SelectorStrategy::new("li.b_algo")?
            .title("h2 a")?
            .link("h2 a")?
            .description(".b_caption p")?;

        Ok(Self {
            base_url: BING_BASE_URL.to_string(),
            output_dir: PathBuf::from("search-bing"),
            strategy: strategy.into(),
        })
    }
}

endpoint_builders!(BingSearch);

impl Skill for BingSearch {
    fn name(&self) -> &str {
        "search-bing"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn title(&self, input: &str) -> String {
        format!("Search results for \"{}\"", input)
    }

    fn request(&self, input: &str) -> Result<AcquisitionRequest> {
        Ok(
            AcquisitionRequest::get(input, build_bing_url(&self.base_url, input))
                .header("User-Agent", BROWSER_USER_AGENT),
        )
    }

    fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }
}

/// Repository search through the GitHub REST API
pub struct GitHubSearch {
    base_url: String,
    output_dir: PathBuf,
    strategy: ExtractionStrategy,
}

impl GitHubSearch {
    pub fn new() -> Self {
        let strategy = FieldMapStrategy::new("/items", "/full_name", "/html_url")
            .description("/description")
            .stars("/stargazers_count");

        Self {
            base_url: GITHUB_API_URL.to_string(),
            output_dir: PathBuf::from("search-github"),
            strategy: strategy.into(),
        }
    }
}

impl Default for GitHubSearch {
    fn default() -> Self {
        Self::new()
    }
}

endpoint_builders!(GitHubSearch);

impl Skill for GitHubSearch {
    fn name(&self) -> &str {
        "search-github"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn title(&self, input: &str) -> String {
        format!("GitHub search results for \"{}\"", input)
    }

    fn request(&self, input: &str) -> Result<AcquisitionRequest> {
        Ok(
            AcquisitionRequest::get(input, build_github_search_url(&self.base_url, input))
                .header("Accept", "application/vnd.github+json")
                .header("User-Agent", API_USER_AGENT),
        )
    }

    fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }
}

/// Video search by scraping the YouTube result page
///
/// The page renders most results client-side, so this often finds nothing;
/// an empty result is reported as such rather than as an error.
pub struct YouTubeSearch {
    base_url: String,
    output_dir: PathBuf,
    strategy: ExtractionStrategy,
}

impl YouTubeSearch {
    pub fn new() -> Result<Self> {
        let strategy = SelectorStrategy::new("a#video-title")?
            .require_href_prefix("/watch")
            .truncate_href_at('&')
            .resolve_against(YOUTUBE_BASE_URL)?;

        Ok(Self {
            base_url: YOUTUBE_BASE_URL.to_string(),
            output_dir: PathBuf::from("search-youtube"),
            strategy: strategy.into(),
        })
    }
}

endpoint_builders!(YouTubeSearch);

impl Skill for YouTubeSearch {
    fn name(&self) -> &str {
        "search-youtube"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn title(&self, input: &str) -> String {
        format!("YouTube search results for \"{}\"", input)
    }

    fn request(&self, input: &str) -> Result<AcquisitionRequest> {
        Ok(
            AcquisitionRequest::get(input, build_youtube_search_url(&self.base_url, input))
                .header("User-Agent", BROWSER_USER_AGENT),
        )
    }

    fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }
}

/// Video search through the YouTube Data API v3
pub struct YouTubeApiSearch {
    base_url: String,
    output_dir: PathBuf,
    api_key: String,
    strategy: ExtractionStrategy,
}

impl YouTubeApiSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        let strategy = FieldMapStrategy::new("/items", "/snippet/title", "/id/videoId")
            .url_prefix(format!("{}/watch?v=", YOUTUBE_BASE_URL))
            .description("/snippet/description");

        Self {
            base_url: YOUTUBE_API_URL.to_string(),
            output_dir: PathBuf::from("search-youtube"),
            api_key: api_key.into(),
            strategy: strategy.into(),
        }
    }
}

endpoint_builders!(YouTubeApiSearch);

impl Skill for YouTubeApiSearch {
    fn name(&self) -> &str {
        "search-youtube"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn title(&self, input: &str) -> String {
        format!("YouTube search results for \"{}\"", input)
    }

    fn request(&self, input: &str) -> Result<AcquisitionRequest> {
        if self.api_key.trim().is_empty() {
            return Err(SkillError::Config("YOUTUBE_API_KEY is not set".to_string()));
        }
        Ok(AcquisitionRequest::get(
            input,
            build_youtube_api_url(&self.base_url, input, &self.api_key),
        ))
    }

    fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }
}

/// Credentials and endpoint for the OpenAI skills
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// API root (default: `https://api.openai.com/v1`)
    pub base_url: String,
    /// Model override; each skill has its own default
    pub model: Option<String>,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_API_URL.to_string(),
            model: None,
        }
    }

    fn authorized(&self, request: AcquisitionRequest) -> Result<AcquisitionRequest> {
        if self.api_key.trim().is_empty() {
            return Err(SkillError::Config(
                "Please set your OPENAI_API_KEY in your environment".to_string(),
            ));
        }
        Ok(request.header("Authorization", format!("Bearer {}", self.api_key)))
    }
}

/// Web-grounded answer from the Chat Completions API
pub struct OpenAiSearch {
    config: OpenAiConfig,
    output_dir: PathBuf,
    strategy: ExtractionStrategy,
}

impl OpenAiSearch {
    pub fn new(config: OpenAiConfig) -> Self {
        let strategy = AnswerStrategy::new("/choices/0/message/content")
            .annotations("/choices/0/message/annotations")
            .response_id("/id");

        Self {
            config,
            output_dir: PathBuf::from("search-openai"),
            strategy: strategy.into(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    fn body(&self, input: &str) -> serde_json::Value {
        json!({
            "model": self.config.model.as_deref().unwrap_or(CHAT_MODEL),
            "messages": [
                { "role": "system", "content": CHAT_SYSTEM_PROMPT },
                { "role": "user", "content": input }
            ],
            "web_search_options": {
                "user_location": {
                    "type": "approximate",
                    "approximate": {
                        "country": "US",
                        "region": "California",
                        "city": "San Francisco"
                    }
                }
            }
        })
    }
}

impl Skill for OpenAiSearch {
    fn name(&self) -> &str {
        "search-openai"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn lowercase_slug(&self) -> bool {
        true
    }

    fn title(&self, input: &str) -> String {
        format!("Search results for \"{}\"", input)
    }

    fn request(&self, input: &str) -> Result<AcquisitionRequest> {
        let url = join_endpoint(&self.config.base_url, "chat/completions");
        self.config
            .authorized(AcquisitionRequest::post_json(input, url, self.body(input)))
    }

    fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }
}

/// Conversational answer from the Responses API
///
/// Passing the id of an earlier response continues that conversation.
pub struct OpenAiResponse {
    config: OpenAiConfig,
    previous_response_id: Option<String>,
    output_dir: PathBuf,
    strategy: ExtractionStrategy,
}

impl OpenAiResponse {
    pub fn new(config: OpenAiConfig) -> Self {
        let strategy = AnswerStrategy::new("/output/0/content/0/text")
            .annotations("/output/0/content/0/annotations")
            .response_id("/id");

        Self {
            config,
            previous_response_id: None,
            output_dir: PathBuf::from("responses-openai"),
            strategy: strategy.into(),
        }
    }

    pub fn with_previous_response(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    fn body(&self, input: &str) -> serde_json::Value {
        let mut body = json!({
            "model": self.config.model.as_deref().unwrap_or(RESPONSES_MODEL),
            "input": input,
        });
        if let Some(id) = &self.previous_response_id {
            body["previous_response_id"] = json!(id);
        }
        body
    }
}

impl Skill for OpenAiResponse {
    fn name(&self) -> &str {
        "respond-openai"
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn lowercase_slug(&self) -> bool {
        true
    }

    fn title(&self, input: &str) -> String {
        format!("Response for \"{}\"", input)
    }

    fn request(&self, input: &str) -> Result<AcquisitionRequest> {
        let url = join_endpoint(&self.config.base_url, "responses");
        self.config
            .authorized(AcquisitionRequest::post_json(input, url, self.body(input)))
    }

    fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    fn header<'a>(request: &'a AcquisitionRequest, name: &str) -> Option<&'a str> {
        request
            .transport
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_bing_request() {
        let skill = BingSearch::new().unwrap();
        let request = skill.request("openai codex").unwrap();

        assert_eq!(request.url, "https://www.bing.com/search?q=openai%20codex");
        assert_eq!(request.transport.method, Method::GET);
        assert_eq!(header(&request, "user-agent"), Some(BROWSER_USER_AGENT));
        assert_eq!(skill.title("openai codex"), "Search results for \"openai codex\"");
        assert_eq!(skill.output_dir(), Path::new("search-bing"));
    }

    #[test]
    fn test_github_request_headers() {
        let skill = GitHubSearch::new().with_base_url("http://localhost:9999");
        let request = skill.request("utility libs").unwrap();

        assert_eq!(
            request.url,
            "http://localhost:9999/search/repositories?q=utility%20libs"
        );
        assert_eq!(header(&request, "accept"), Some("application/vnd.github+json"));
        assert!(header(&request, "user-agent").is_some());
    }

    #[test]
    fn test_youtube_api_requires_key() {
        let result = YouTubeApiSearch::new("  ").request("lofi");
        assert!(matches!(result, Err(SkillError::Config(_))));

        let request = YouTubeApiSearch::new("KEY").request("lofi").unwrap();
        assert!(request.url.ends_with("&q=lofi&key=KEY"));
    }

    #[test]
    fn test_openai_search_request() {
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = "http://localhost:1234/v1/".to_string();
        let skill = OpenAiSearch::new(config);

        let request = skill.request("What is Rust?").unwrap();
        assert_eq!(request.url, "http://localhost:1234/v1/chat/completions");
        assert_eq!(request.transport.method, Method::POST);
        assert_eq!(header(&request, "authorization"), Some("Bearer sk-test"));

        let body = request.transport.body.unwrap();
        assert_eq!(body["model"], CHAT_MODEL);
        assert_eq!(body["messages"][1]["content"], "What is Rust?");
        assert_eq!(
            body["web_search_options"]["user_location"]["type"],
            "approximate"
        );
        assert!(skill.lowercase_slug());
    }

    #[test]
    fn test_openai_requires_api_key() {
        let result = OpenAiSearch::new(OpenAiConfig::new("")).request("q");
        assert!(matches!(result, Err(SkillError::Config(_))));
    }

    #[test]
    fn test_openai_response_chains_previous_id() {
        let mut config = OpenAiConfig::new("sk-test");
        config.model = Some("gpt-test".to_string());

        let fresh = OpenAiResponse::new(config.clone()).request("hi").unwrap();
        let fresh_body = fresh.transport.body.unwrap();
        assert_eq!(fresh_body["model"], "gpt-test");
        assert!(fresh_body.get("previous_response_id").is_none());

        let chained = OpenAiResponse::new(config)
            .with_previous_response("resp_abc")
            .request("and then?")
            .unwrap();
        assert_eq!(
            chained.transport.body.unwrap()["previous_response_id"],
            "resp_abc"
        );
        assert!(chained.url.ends_with("/v1/responses"));
    }
}
