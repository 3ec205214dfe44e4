use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// football-data team identifier.
pub type TeamId = i64;

/// Season statistics keyed by team id, as returned to callers under `standings`.
pub type StandingsMap = BTreeMap<TeamId, TeamSeasonStats>;

/// A team as referenced by a fixture or standings row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRef {
    /// `null` upstream for knockout slots that are not decided yet
    pub id: Option<TeamId>,
    pub name: Option<String>,
    /// shortName, tla, crest, ... passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One team's line in the league table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSeasonStats {
    pub position: u32,
    /// Signed: points deductions can push a side below zero
    pub points: i32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub played: u32,
}

/// Pre-match outcome estimates attached to fixtures that have not kicked off.
///
/// There is deliberately no draw field: the estimator reserves a draw
/// allowance when normalising strengths but does not publish it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Probabilities {
    pub team1_win: f64,
    pub team2_win: f64,
    #[serde(rename = "over1_5")]
    pub over_1_5: f64,
    #[serde(rename = "under1_5")]
    pub under_1_5: f64,
    #[serde(rename = "over2_5")]
    pub over_2_5: f64,
    #[serde(rename = "firstHalfOver0_5")]
    pub first_half_over_0_5: f64,
    #[serde(rename = "firstHalfUnder1_5")]
    pub first_half_under_1_5: f64,
}

/// An upstream match record. Fields we do not interpret (utcDate, score,
/// matchday, stage, referees, ...) are kept in `extra` and serialized back
/// verbatim; absent teams stay absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: i64,
    /// SCHEDULED | TIMED | IN_PLAY | PAUSED | FINISHED | POSTPONED | ...
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<TeamRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<TeamRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Probabilities>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Fixture {
    /// Not yet kicked off; only these fixtures get probabilities.
    pub fn is_upcoming(&self) -> bool {
        matches!(self.status.as_str(), "SCHEDULED" | "TIMED")
    }

    pub fn home_team_id(&self) -> Option<TeamId> {
        self.home_team.as_ref().and_then(|t| t.id)
    }

    pub fn away_team_id(&self) -> Option<TeamId> {
        self.away_team.as_ref().and_then(|t| t.id)
    }
}

/// Body of `GET /competitions/{league}/matches`.
#[derive(Debug, Clone, Deserialize)]
pub struct FixturesPayload {
    pub matches: Vec<Fixture>,
    /// filters, resultSet, competition, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What `GET /fixtures` returns: the upstream payload with `matches`
/// replaced, plus our standings map and a computation timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixturesResponse {
    #[serde(flatten)]
    pub upstream: Map<String, Value>,
    pub matches: Vec<Fixture>,
    pub standings: StandingsMap,
    pub last_updated: DateTime<Utc>,
}

impl FixturesResponse {
    pub fn new(
        mut upstream: Map<String, Value>,
        matches: Vec<Fixture>,
        standings: StandingsMap,
        last_updated: DateTime<Utc>,
    ) -> Self {
        // Our keys win over anything upstream happens to send under the same name.
        for key in ["matches", "standings", "lastUpdated"] {
            upstream.remove(key);
        }
        FixturesResponse {
            upstream,
            matches,
            standings,
            last_updated,
        }
    }
}
