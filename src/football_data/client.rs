use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::{FixtureSource, StandingsResponse};
use crate::config::ApiKey;
use crate::models::FixturesPayload;
use crate::week::WeekWindow;

const AUTH_HEADER: &str = "X-Auth-Token";

/// A failed call to football-data. Messages are safe to hand to callers:
/// they never carry the credential or the request URL.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Football API error: {status}")]
    Status { status: StatusCode },

    #[error("Football API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Football API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Football API returned an unreadable body: {0}")]
    Decode(String),
}

/// Client for the football-data.org v4 REST API.
#[derive(Clone)]
pub struct FootballDataClient {
    http: Client,
    base_url: Url,
    auth_token: HeaderValue,
    timeout: Duration,
}

impl FootballDataClient {
    pub fn new(base_url: &str, api_key: &ApiKey, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid football-data URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("football-data URL cannot be used as a base: {}", base_url);
        }

        let mut auth_token = HeaderValue::from_str(api_key.expose())
            .context("football-data API key is not a valid header value")?;
        auth_token.set_sensitive(true);

        Ok(FootballDataClient {
            http,
            base_url,
            auth_token,
            timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Only fails for cannot-be-a-base URLs, which `new` rejects.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(AUTH_HEADER, self.auth_token.clone())
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { status });
        }

        let body = resp.bytes().await.map_err(|e| self.request_error(e))?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    fn request_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Transport(err.without_url())
        }
    }
}

#[async_trait]
impl FixtureSource for FootballDataClient {
    async fn fetch_matches(
        &self,
        league: &str,
        window: &WeekWindow,
    ) -> Result<FixturesPayload, UpstreamError> {
        let mut url = self.endpoint(&["competitions", league, "matches"]);
        url.query_pairs_mut()
            .append_pair("dateFrom", &window.date_from_param())
            .append_pair("dateTo", &window.date_to_param());

        let payload: FixturesPayload = self.get_json(url).await?;
        debug!(
            "Fetched {} matches for {} ({})",
            payload.matches.len(),
            league,
            window
        );
        Ok(payload)
    }

    async fn fetch_standings(&self, league: &str) -> Result<StandingsResponse, UpstreamError> {
        self.get_json(self.endpoint(&["competitions", league, "standings"]))
            .await
    }
}
