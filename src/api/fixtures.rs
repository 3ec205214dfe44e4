use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::{ApiError, AppState};
use crate::estimator::estimate_fixture;
use crate::football_data::{is_competition_code, StandingsOutcome};
use crate::models::{Fixture, FixturesResponse, StandingsMap};
use crate::week::WeekWindow;

#[derive(Debug, Deserialize)]
pub struct FixturesQuery {
    league: Option<String>,
}

/// GET /fixtures?league=PL
///
/// This week's fixtures with probabilities on every match that has not
/// kicked off. Standings are best-effort; the fixtures call is not.
pub async fn fixtures_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    query: Option<Query<FixturesQuery>>,
) -> Result<impl IntoResponse, ApiError> {
    // HEAD is routed to GET handlers; it is not one of ours.
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let requested = query.and_then(|Query(q)| q.league);
    let league = resolve_league(requested.as_deref(), &state.default_league);
    let window = WeekWindow::current();

    let payload = state.source.fetch_matches(&league, &window).await?;

    let standings =
        StandingsOutcome::from_fetch(&league, state.source.fetch_standings(&league).await);
    let degraded = standings.is_degraded();
    let standings = standings.into_map();

    let matches = enrich_matches(payload.matches, &standings);
    let estimated = matches.iter().filter(|m| m.probabilities.is_some()).count();
    info!(
        "Served {} fixtures for {} ({}), {} estimated, {} teams in table{}",
        matches.len(),
        league,
        window,
        estimated,
        standings.len(),
        if degraded { " (standings unavailable)" } else { "" }
    );

    let response = FixturesResponse::new(payload.extra, matches, standings, Utc::now());
    let body = serde_json::to_vec(&response)
        .map_err(|e| ApiError::Internal(format!("Failed to encode response: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CACHE_CONTROL, state.cache_control.clone()),
        ],
        body,
    ))
}

/// Upper-cased `requested` when it looks like a competition code, otherwise
/// the default.
pub fn resolve_league(requested: Option<&str>, default: &str) -> String {
    match requested.map(str::trim) {
        Some(code) if is_competition_code(code) => code.to_ascii_uppercase(),
        Some(code) => {
            debug!("Ignoring malformed league {:?}, using {}", code, default);
            default.to_string()
        }
        None => default.to_string(),
    }
}

/// Attach probabilities to fixtures that have not started; everything else
/// passes through untouched.
pub fn enrich_matches(matches: Vec<Fixture>, standings: &StandingsMap) -> Vec<Fixture> {
    matches
        .into_iter()
        .map(|mut fixture| {
            if fixture.is_upcoming() {
                fixture.probabilities = Some(estimate_fixture(&fixture, standings));
            }
            fixture
        })
        .collect()
}
