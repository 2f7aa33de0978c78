//! HTTP access to the scrape server
//!
//! `ScrapeApi` is the seam the controller's requests go through; `HttpScrapeApi`
//! is the reqwest-backed implementation used by the app.

use crate::constants::{PROFILES_PATH, START_SCRAPE_PATH};
use crate::types::Envelope;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("{0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is missing the profiles list")]
    MissingProfiles,
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(describe_transport_error(&e))
    }
}

/// reqwest's own message leaves out the cause ("operation timed out",
/// "Connection refused"), so the whole source chain is joined into one line.
fn describe_transport_error(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    if e.is_timeout() && !message.contains("timed out") {
        message.push_str(": operation timed out");
    }
    message
}

/// The two calls the client makes against the server
pub trait ScrapeApi: Send + Sync {
    /// POST with an empty body; the server runs the scrape before answering
    fn start_scrape(&self) -> impl Future<Output = Result<Envelope, ApiError>> + Send;

    fn list_profiles(&self) -> impl Future<Output = Result<Envelope, ApiError>> + Send;
}

pub struct HttpScrapeApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScrapeApi {
    pub fn new(server_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(server_url)?;
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("profile-scraper-client/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        debug!(base_url = %base_url, timeout = ?timeout, "HTTP client created");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, method: reqwest::Method, path: &str) -> Result<Envelope, ApiError> {
        let url = join_endpoint(&self.base_url, path);
        let response = self.client.request(method.clone(), &url).send().await?;
        let status = response.status();
        // Failed scrapes come back as HTTP 500 with a JSON envelope, so the body
        // is decoded whatever the status code.
        let body = response.bytes().await?;
        debug!(method = %method, url = %url, status = %status, bytes = body.len(), "Response received");
        Ok(serde_json::from_slice(&body)?)
    }
}

impl ScrapeApi for HttpScrapeApi {
    fn start_scrape(&self) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        self.fetch(reqwest::Method::POST, START_SCRAPE_PATH)
    }

    fn list_profiles(&self) -> impl Future<Output = Result<Envelope, ApiError>> + Send {
        self.fetch(reqwest::Method::GET, PROFILES_PATH)
    }
}

/// Validate a user-supplied server url and strip any trailing slash
pub fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ApiError::InvalidUrl {
        url: trimmed.to_string(),
        reason,
    };
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Append an endpoint path to a base url, keeping any path prefix of the base
pub fn join_endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://127.0.0.1:5000", "http://127.0.0.1:5000")]
    #[case("http://127.0.0.1:5000/", "http://127.0.0.1:5000")]
    #[case("  https://scraper.example.com/app/  ", "https://scraper.example.com/app")]
    fn normalizes_base_url(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_base_url(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("localhost:5000")]
    #[case("ftp://example.com")]
    #[case("http://example.com/?x=1")]
    fn rejects_bad_base_url(#[case] raw: &str) {
        assert!(matches!(
            normalize_base_url(raw),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn join_keeps_prefix() {
        assert_eq!(
            join_endpoint("http://host/app", PROFILES_PATH),
            "http://host/app/api/profiles"
        );
        assert_eq!(
            join_endpoint("http://host:5000", START_SCRAPE_PATH),
            "http://host:5000/api/start-scrape"
        );
    }

    #[test]
    fn network_error_displays_its_message() {
        let err = ApiError::Network("timeout".to_string());
        assert_eq!(err.to_string(), "timeout");
    }

    #[test]
    fn decode_error_is_prefixed() {
        let err: ApiError = serde_json::from_str::<Envelope>("<html>")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("malformed response: "));
    }

    #[test]
    fn client_builds_with_timeout() {
        let api = HttpScrapeApi::new("http://localhost:5000/", Some(Duration::from_secs(5))).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
    }
}
