//! Typed client for the Gemsrack REST API

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{
    AdminGemListResponse, AdminProbe, AdminUsageResponse, GemDetailResponse, GemListResponse,
    OkResponse, TeamUsageResponse, UpdateGemResponse,
};

/// Default server address when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Default page size for the public gem list (server clamps to [1, 200])
pub const DEFAULT_LIST_LIMIT: u32 = 200;

/// Smallest and largest accepted usage window, in days
pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 365;

const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True when the server rejected the call for lack of an admin session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Clamp a usage window to the accepted range before it goes on the wire
pub fn clamp_days(days: u32) -> u32 {
    days.clamp(MIN_DAYS, MAX_DAYS)
}

/// Build query pairs the way the dashboard does: values are trimmed and
/// blank ones are omitted entirely instead of sent as empty strings.
fn build_query(pairs: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|(key, value)| {
            let value = value.as_deref()?.trim();
            if value.is_empty() {
                None
            } else {
                Some(((*key).to_string(), value.to_string()))
            }
        })
        .collect()
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct UpdateEnabledRequest {
    enabled: bool,
}

/// HTTP client for a Gemsrack server.
///
/// One instance owns one cookie jar, so the admin session established by
/// `admin_login` rides along on subsequent admin calls.
pub struct ApiService {
    client: Client,
    base_url: Url,
}

impl ApiService {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(concat!("gemsrack-console/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List gems visible to a team
    pub async fn list_gems(
        &self,
        team_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<GemListResponse, ApiError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let query = build_query(&[
            ("team_id", team_id.map(str::to_string)),
            ("limit", Some(limit.to_string())),
        ]);
        self.get_json(&["api", "gems"], &query).await
    }

    /// Fetch one gem including its prompt bodies
    pub async fn get_gem(
        &self,
        name: &str,
        team_id: Option<&str>,
    ) -> Result<GemDetailResponse, ApiError> {
        let query = build_query(&[("team_id", team_id.map(str::to_string))]);
        self.get_json(&["api", "gems", name], &query).await
    }

    /// Team-wide usage summary with daily series and top-gems ranking
    pub async fn team_usage(
        &self,
        team_id: Option<&str>,
        days: u32,
        limit: Option<u32>,
    ) -> Result<TeamUsageResponse, ApiError> {
        let query = build_query(&[
            ("team_id", team_id.map(str::to_string)),
            ("days", Some(clamp_days(days).to_string())),
            ("limit", limit.map(|l| l.to_string())),
        ]);
        self.get_json(&["api", "metrics", "gem-usage"], &query).await
    }

    /// Probe the admin session cookie
    pub async fn admin_probe(&self) -> Result<AdminProbe, ApiError> {
        self.get_json(&["api", "admin", "me"], &[]).await
    }

    /// Establish an admin session; the cookie lands in this client's jar
    pub async fn admin_login(&self, password: &str) -> Result<OkResponse, ApiError> {
        let request = self
            .request(Method::POST, &["api", "admin", "login"], &[])?
            .json(&LoginRequest { password });
        Self::fetch_json(request).await
    }

    /// Tear down the admin session server-side
    pub async fn admin_logout(&self) -> Result<OkResponse, ApiError> {
        let request = self.request(Method::POST, &["api", "admin", "logout"], &[])?;
        Self::fetch_json(request).await
    }

    /// Admin view of the gem list, including the run toggle
    pub async fn admin_list_gems(
        &self,
        team_id: Option<&str>,
    ) -> Result<AdminGemListResponse, ApiError> {
        let query = build_query(&[("team_id", team_id.map(str::to_string))]);
        self.get_json(&["api", "admin", "gems"], &query).await
    }

    /// Flip a gem's enabled flag
    pub async fn admin_set_gem_enabled(
        &self,
        name: &str,
        enabled: bool,
        team_id: Option<&str>,
    ) -> Result<UpdateGemResponse, ApiError> {
        let query = build_query(&[("team_id", team_id.map(str::to_string))]);
        let request = self
            .request(Method::PATCH, &["api", "admin", "gems", name], &query)?
            .json(&UpdateEnabledRequest { enabled });
        Self::fetch_json(request).await
    }

    /// Per-gem-per-day usage rows plus the window summary
    pub async fn admin_usage(
        &self,
        team_id: Option<&str>,
        days: u32,
    ) -> Result<AdminUsageResponse, ApiError> {
        let query = build_query(&[
            ("team_id", team_id.map(str::to_string)),
            ("days", Some(clamp_days(days).to_string())),
        ]);
        self.get_json(&["api", "admin", "usage"], &query).await
    }

    /// Plain-text liveness probe
    pub async fn health(&self) -> Result<String, ApiError> {
        let request = self.request(Method::GET, &["health"], &[])?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(status_error(status, body));
        }

        Ok(body.trim().to_string())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?;
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        let request_id = Uuid::new_v4();
        tracing::debug!(%method, %url, %request_id, "Gemsrack API request");

        let mut builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        Ok(builder)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let request = self.request(Method::GET, segments, query)?;
        Self::fetch_json(request).await
    }

    async fn fetch_json<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn status_error(status: reqwest::StatusCode, body: String) -> ApiError {
    // Fall back to the canonical reason when the body is blank, so the
    // surfaced message always says something.
    let body = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };
    ApiError::Status {
        status: status.as_u16(),
        body,
    }
}
