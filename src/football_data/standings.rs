use serde::Deserialize;
use tracing::warn;

use super::UpstreamError;
use crate::models::{StandingsMap, TeamRef, TeamSeasonStats};

/// Body of `GET /competitions/{league}/standings`.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsResponse {
    #[serde(default)]
    pub standings: Vec<StandingGroup>,
}

/// One table: TOTAL, HOME or AWAY, or a cup group.
#[derive(Debug, Clone, Deserialize)]
pub struct StandingGroup {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub table: Option<Vec<StandingRow>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    pub position: u32,
    pub team: TeamRef,
    pub played_games: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: i32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
}

impl StandingRow {
    pub fn stats(&self) -> TeamSeasonStats {
        TeamSeasonStats {
            position: self.position,
            points: self.points,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: self.goal_difference,
            won: self.won,
            draw: self.draw,
            lost: self.lost,
            played: self.played_games,
        }
    }
}

impl StandingsResponse {
    /// Team id → season stats from the first table. Rows without a team id
    /// are skipped.
    pub fn into_map(self) -> Result<StandingsMap, String> {
        let first = self
            .standings
            .into_iter()
            .next()
            .ok_or_else(|| "response contains no standings".to_string())?;
        let table = first
            .table
            .ok_or_else(|| format!("{} standings have no table", first.kind.as_deref().unwrap_or("first")))?;

        Ok(table
            .iter()
            .filter_map(|row| Some((row.team.id?, row.stats())))
            .collect())
    }
}

/// Result of the best-effort standings lookup. A failure here never fails
/// the request: it just means every team is estimated as unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum StandingsOutcome {
    Available(StandingsMap),
    Degraded { cause: String },
}

impl StandingsOutcome {
    /// Fold a fetch result into an outcome, logging the cause when degraded.
    pub fn from_fetch(league: &str, fetched: Result<StandingsResponse, UpstreamError>) -> Self {
        let map = fetched
            .map_err(|e| e.to_string())
            .and_then(StandingsResponse::into_map);
        match map {
            Ok(map) => StandingsOutcome::Available(map),
            Err(cause) => {
                warn!("Could not fetch standings for {}: {}", league, cause);
                StandingsOutcome::Degraded { cause }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StandingsOutcome::Degraded { .. })
    }

    pub fn into_map(self) -> StandingsMap {
        match self {
            StandingsOutcome::Available(map) => map,
            StandingsOutcome::Degraded { .. } => StandingsMap::new(),
        }
    }
}
