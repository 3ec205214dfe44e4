use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use std::fmt;
use std::time::Duration;

use crate::football_data::is_competition_code;

/// football-data.org credential. Never printed: `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        ApiKey(key)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Weekly fixtures proxy with pre-match probabilities
#[derive(Parser, Debug, Clone)]
#[command(name = "matchweek-odds", version, about)]
pub struct Config {
    /// Listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: String,

    /// football-data.org API base URL
    #[arg(
        long,
        env = "FOOTBALL_DATA_API_URL",
        default_value = "https://api.football-data.org/v4"
    )]
    pub football_data_url: String,

    /// football-data.org API key (sent as X-Auth-Token)
    #[arg(long, env = "FOOTBALL_DATA_API_KEY", hide_env_values = true)]
    pub football_data_api_key: ApiKey,

    /// Competition used when a request has no usable `league` parameter
    #[arg(long, env = "DEFAULT_LEAGUE", default_value = "PL")]
    pub default_league: String,

    /// Timeout for each upstream request, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "5")]
    pub upstream_timeout_secs: u64,

    /// Shared-cache lifetime of a successful response (`s-maxage`)
    #[arg(long, env = "CACHE_MAX_AGE_SECS", default_value = "300")]
    pub cache_max_age_secs: u64,

    /// Window in which a stale response may be served while revalidating
    #[arg(long, env = "CACHE_SWR_SECS", default_value = "60")]
    pub cache_swr_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.football_data_api_key.expose().trim().is_empty() {
            anyhow::bail!("FOOTBALL_DATA_API_KEY must not be empty");
        }
        if !(self.football_data_url.starts_with("http://")
            || self.football_data_url.starts_with("https://"))
        {
            anyhow::bail!(
                "football_data_url must be an http(s) URL, got {}",
                self.football_data_url
            );
        }
        if !is_competition_code(&self.default_league) {
            anyhow::bail!(
                "default_league must be a competition code such as PL, got {:?}",
                self.default_league
            );
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("upstream_timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// `Cache-Control` value for successful fixtures responses.
    pub fn cache_control(&self) -> anyhow::Result<HeaderValue> {
        HeaderValue::from_str(&format!(
            "s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age_secs, self.cache_swr_secs
        ))
        .context("Invalid Cache-Control value")
    }
}
