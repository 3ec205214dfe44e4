pub mod client;
pub mod source;
pub mod standings;

pub use client::{FootballDataClient, UpstreamError};
pub use source::FixtureSource;
pub use standings::{StandingsOutcome, StandingsResponse};

const MAX_COMPETITION_CODE_LEN: usize = 16;

/// football-data competition codes (`PL`, `BL1`, `SA`, ...) or numeric ids.
pub fn is_competition_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_COMPETITION_CODE_LEN
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}
