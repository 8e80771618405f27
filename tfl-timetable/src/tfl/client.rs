//! TfL Unified API HTTP client.
//!
//! Provides async methods for the three endpoints the timetable service
//! needs: stop search, stop point details and line timetables. Every
//! request is authenticated with the `app_key` query parameter and tagged
//! with a fixed `User-Agent`.

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::api::{TimetableQuery, TransitApi};
use super::error::TflError;
use super::types::{SearchMatch, SearchResponse, StopPoint, TimetableOutcome, TimetableResponse};

/// Default base URL for the TfL Unified API.
pub const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("tfl-timetable/", env!("CARGO_PKG_VERSION"));

/// Configuration for the TfL client.
#[derive(Debug, Clone)]
pub struct TflConfig {
    /// Application key, sent as the `app_key` query parameter
    pub app_key: String,
    /// Base URL for the API (defaults to production TfL)
    pub base_url: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TflConfig {
    /// Create a new config with the given app key.
    pub fn new(app_key: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// TfL Unified API client.
///
/// Built once at start-up; the key, base URL and headers never change
/// afterwards, so the client can be shared freely between requests.
#[derive(Debug, Clone)]
pub struct TflClient {
    http: reqwest::Client,
    base_url: Url,
    app_key: String,
}

impl TflClient {
    /// Create a new TfL client with the given configuration.
    pub fn new(config: TflConfig) -> Result<Self, TflError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TflError::NotConfigured(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TflError::NotConfigured(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }

        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| TflError::NotConfigured("invalid User-Agent".to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            app_key: config.app_key,
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TflError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TflError::NotConfigured("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Issue a GET and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(String, String)],
    ) -> Result<T, TflError> {
        debug!(%url, "TfL request");

        let mut request = self.http.get(url).query(params);
        if !self.app_key.is_empty() {
            request = request.query(&[("app_key", self.app_key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TflError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TflError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TflError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TflError::json(&e, &body))
    }
}

impl TransitApi for TflClient {
    async fn search(&self, query: &str, mode: &str) -> Result<Vec<SearchMatch>, TflError> {
        let url = self.endpoint(&["StopPoint", "Search", query])?;
        let params = [
            ("modes".to_string(), mode.to_string()),
            ("includeHubs".to_string(), "false".to_string()),
        ];

        let response: SearchResponse = self.get_json(url, &params).await?;
        Ok(response.matches)
    }

    async fn stop_points(&self, ids: &[String]) -> Result<Vec<StopPoint>, TflError> {
        let joined = ids.join(",");
        let url = self.endpoint(&["StopPoint", &joined])?;
        self.get_json(url, &[]).await
    }

    async fn timetable(&self, query: &TimetableQuery) -> Result<TimetableOutcome, TflError> {
        let mut segments = vec![
            "Line",
            query.line_id.as_str(),
            "Timetable",
            query.from_stop_point_id.as_str(),
        ];
        if let Some(to) = &query.to_stop_point_id {
            segments.extend(["to", to.as_str()]);
        }
        let url = self.endpoint(&segments)?;

        let response: TimetableResponse = self.get_json(url, &query.params).await?;
        Ok(TimetableOutcome::from(response))
    }
}
