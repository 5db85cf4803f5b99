//! URL helper functions for the supported providers
//!
//! Provides default endpoints and builders for search URLs.

/// Bing web search
pub const BING_BASE_URL: &str = "https://www.bing.com";

/// GitHub REST API
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// YouTube web front end
pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// YouTube Data API v3
pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// OpenAI REST API
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// mail.tm REST API
pub const MAIL_TM_API_URL: &str = "https://api.mail.tm";

/// Builds the Bing result page URL for a query
///
/// # Example
/// ```
/// use skillpipe_core::url::build_bing_url;
/// let url = build_bing_url("https://www.bing.com", "openai codex");
/// assert_eq!(url, "https://www.bing.com/search?q=openai%20codex");
/// ```
pub fn build_bing_url(base: &str, query: &str) -> String {
    format!("{}/search?q={}", base, urlencoding::encode(query))
}

/// Builds the GitHub repository search URL for a query
///
/// # Example
/// ```
/// use skillpipe_core::url::build_github_search_url;
/// let url = build_github_search_url("https://api.github.com", "utility libs");
/// assert_eq!(url, "https://api.github.com/search/repositories?q=utility%20libs");
/// ```
pub fn build_github_search_url(base: &str, query: &str) -> String {
    format!("{}/search/repositories?q={}", base, urlencoding::encode(query))
}

/// Builds the YouTube result page URL for a query
pub fn build_youtube_search_url(base: &str, query: &str) -> String {
    format!("{}/results?search_query={}", base, urlencoding::encode(query))
}

/// Builds the YouTube Data API video search URL
pub fn build_youtube_api_url(base: &str, query: &str, api_key: &str) -> String {
    format!(
        "{}/search?part=snippet&type=video&maxResults=25&q={}&key={}",
        base,
        urlencoding::encode(query),
        urlencoding::encode(api_key)
    )
}

/// Joins an API base and an endpoint path without doubling slashes
///
/// # Example
/// ```
/// use skillpipe_core::url::join_endpoint;
/// assert_eq!(join_endpoint("https://api.openai.com/v1/", "/responses"), "https://api.openai.com/v1/responses");
/// ```
pub fn join_endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
