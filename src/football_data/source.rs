use async_trait::async_trait;

use super::{StandingsResponse, UpstreamError};
use crate::models::FixturesPayload;
use crate::week::WeekWindow;

/// Where fixtures and standings come from.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Matches of `league` kicking off inside `window`.
    async fn fetch_matches(
        &self,
        league: &str,
        window: &WeekWindow,
    ) -> Result<FixturesPayload, UpstreamError>;

    /// Current league table(s) for `league`.
    async fn fetch_standings(&self, league: &str) -> Result<StandingsResponse, UpstreamError>;
}
