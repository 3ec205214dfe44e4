//! Pre-match outcome estimates from league-table form.
//!
//! A team's **strength** is a weighted blend of points per game, goal
//! difference per game and win ratio, squeezed into [0.1, 0.9]. Win chances
//! come from comparing the two strengths after a home bonus, with a fixed
//! draw allowance in the denominator. Goal markets are simple piecewise-linear
//! curves over the sum of both sides' scoring rates.
//!
//! Everything here is pure: same inputs, same numbers.

use crate::models::{Fixture, Probabilities, StandingsMap, TeamSeasonStats};

/// Strength assumed for a side with no table data or no games played.
const NEUTRAL_STRENGTH: f64 = 0.5;
const MIN_STRENGTH: f64 = 0.1;
const MAX_STRENGTH: f64 = 0.9;

const MAX_POINTS_PER_MATCH: f64 = 3.0;
/// Goal difference per game is divided by this before clamping to [-1, 1].
const GOAL_DIFF_SCALE: f64 = 3.0;

const PPG_WEIGHT: f64 = 0.4;
const GOAL_DIFF_WEIGHT: f64 = 0.3;
const WIN_RATIO_WEIGHT: f64 = 0.3;

/// Added to the home side's strength before normalisation.
const HOME_ADVANTAGE: f64 = 0.1;
/// Mass reserved for the draw when normalising the two strengths.
const DRAW_ALLOWANCE: f64 = 0.3;
const MIN_WIN_PROB: f64 = 0.15;
const MAX_WIN_PROB: f64 = 0.75;

/// Scoring rate assumed for a side with no table data.
const DEFAULT_GOALS_PER_GAME: f64 = 1.5;
/// Share of a match's goals expected before half time.
const FIRST_HALF_SHARE: f64 = 0.6;

// ── Public API ───────────────────────────────────────────────────────────────

/// Estimate a fixture by looking both sides up in the standings.
/// Teams missing from the table (or with no id yet) count as unknown.
pub fn estimate_fixture(fixture: &Fixture, standings: &StandingsMap) -> Probabilities {
    let lookup = |id: Option<i64>| id.and_then(|id| standings.get(&id));
    estimate_probabilities(lookup(fixture.home_team_id()), lookup(fixture.away_team_id()))
}

/// Full set of pre-match probabilities for home vs away.
pub fn estimate_probabilities(
    home: Option<&TeamSeasonStats>,
    away: Option<&TeamSeasonStats>,
) -> Probabilities {
    let (team1_win, team2_win) = win_probabilities(team_strength(home), team_strength(away));
    let goals = GoalMarkets::from_expected(goals_per_game(home) + goals_per_game(away));

    let over_1_5 = round2(goals.over_1_5);
    Probabilities {
        team1_win: round2(team1_win),
        team2_win: round2(team2_win),
        over_1_5,
        // Derived from the rounded value so the pair always sums to 1.00.
        under_1_5: round2(1.0 - over_1_5),
        over_2_5: round2(goals.over_2_5),
        first_half_over_0_5: round2(goals.first_half_over_0_5),
        first_half_under_1_5: round2(goals.first_half_under_1_5),
    }
}

/// Current-form strength in [0.1, 0.9]; exactly 0.5 when unknown.
pub fn team_strength(stats: Option<&TeamSeasonStats>) -> f64 {
    let Some(stats) = stats.filter(|s| s.played > 0) else {
        return NEUTRAL_STRENGTH;
    };
    let played = stats.played as f64;

    let ppg = stats.points as f64 / played / MAX_POINTS_PER_MATCH;
    let goal_diff = (stats.goal_difference as f64 / played / GOAL_DIFF_SCALE).clamp(-1.0, 1.0);
    let win_ratio = stats.won as f64 / played;

    let strength = ppg * PPG_WEIGHT
        + (goal_diff + 1.0) / 2.0 * GOAL_DIFF_WEIGHT
        + win_ratio * WIN_RATIO_WEIGHT;
    strength.clamp(MIN_STRENGTH, MAX_STRENGTH)
}

// ── Match result ─────────────────────────────────────────────────────────────

/// (home win, away win). Each side is clamped on its own: the clamp is a hard
/// cap and the freed or borrowed mass is not redistributed.
fn win_probabilities(home_strength: f64, away_strength: f64) -> (f64, f64) {
    let home = home_strength + HOME_ADVANTAGE;
    let total = home + away_strength + DRAW_ALLOWANCE;
    (
        (home / total).clamp(MIN_WIN_PROB, MAX_WIN_PROB),
        (away_strength / total).clamp(MIN_WIN_PROB, MAX_WIN_PROB),
    )
}

// ── Goals ────────────────────────────────────────────────────────────────────

fn goals_per_game(stats: Option<&TeamSeasonStats>) -> f64 {
    match stats {
        Some(s) if s.played > 0 => s.goals_for as f64 / s.played as f64,
        _ => DEFAULT_GOALS_PER_GAME,
    }
}

/// Unrounded goal-line probabilities for a given combined expectation.
#[derive(Debug, Clone, Copy)]
struct GoalMarkets {
    over_1_5: f64,
    over_2_5: f64,
    first_half_over_0_5: f64,
    first_half_under_1_5: f64,
}

impl GoalMarkets {
    fn from_expected(expected: f64) -> Self {
        let expected = expected.max(0.0);

        let over_1_5 = if expected > 1.5 {
            (0.6 + (expected - 1.5) * 0.15).min(0.95)
        } else {
            0.4 + expected * 0.13
        };
        let over_2_5 = if expected > 2.5 {
            (0.4 + (expected - 2.5) * 0.12).min(0.85)
        } else {
            0.25 + expected * 0.1
        };

        let first_half = expected * FIRST_HALF_SHARE;
        GoalMarkets {
            over_1_5,
            over_2_5,
            first_half_over_0_5: (0.5 + first_half * 0.2).min(0.9),
            // Falls with scoring rate; floor it so huge rates stay a probability.
            first_half_under_1_5: (0.7 - first_half * 0.1).clamp(0.0, 0.9),
        }
    }
}

/// Two decimal places, ties away from zero.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamRef;
    use approx::assert_relative_eq;

    fn stats(played: u32, points: i32, won: u32, goals_for: u32, goal_difference: i32) -> TeamSeasonStats {
        TeamSeasonStats {
            played,
            points,
            won,
            goals_for,
            goal_difference,
            goals_against: (goals_for as i32 - goal_difference).max(0) as u32,
            ..Default::default()
        }
    }

    fn in_unit_range(p: &Probabilities) -> bool {
        [
            p.team1_win,
            p.team2_win,
            p.over_1_5,
            p.under_1_5,
            p.over_2_5,
            p.first_half_over_0_5,
            p.first_half_under_1_5,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }

    // ── Strength ─────────────────────────────────────────────────────────────

    #[test]
    fn unknown_team_is_neutral() {
        assert_eq!(team_strength(None), 0.5);
        let fresh = TeamSeasonStats { position: 20, ..Default::default() };
        assert_eq!(team_strength(Some(&fresh)), 0.5);
    }

    #[test]
    fn strength_follows_weighted_formula() {
        // 25 pts from 10, +10 GD, 8 wins:
        // 0.833*0.4 + 0.667*0.3 + 0.8*0.3 = 0.7733
        let s = team_strength(Some(&stats(10, 25, 8, 20, 10)));
        assert_relative_eq!(s, 0.773_333, epsilon = 1e-5);
    }

    #[test]
    fn strength_saturates_at_both_ends() {
        let hopeless = stats(10, 0, 0, 0, -50);
        let perfect = stats(10, 30, 10, 60, 50);
        assert_relative_eq!(team_strength(Some(&hopeless)), 0.1, epsilon = 1e-12);
        assert_relative_eq!(team_strength(Some(&perfect)), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn strength_stays_in_bounds_for_any_table_line() {
        for played in [1u32, 5, 19, 38] {
            for won in 0..=played {
                for draws in [0, (played - won) / 2, played - won] {
                    for gd in [-120, -30, -1, 0, 1, 30, 120] {
                        let points = (won * 3 + draws) as i32;
                        let s = team_strength(Some(&stats(played, points, won, 40, gd)));
                        assert!(
                            (0.1..=0.9).contains(&s),
                            "out of range for p={} w={} d={} gd={}: {}",
                            played,
                            won,
                            draws,
                            gd,
                            s
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn deducted_points_do_not_escape_bounds() {
        let s = team_strength(Some(&stats(4, -9, 0, 1, -10)));
        assert_relative_eq!(s, 0.1, epsilon = 1e-12);
    }

    // ── Win probabilities ────────────────────────────────────────────────────

    #[test]
    fn both_unknown_gives_home_edge() {
        let p = estimate_probabilities(None, None);
        // 0.6 / 1.4 and 0.5 / 1.4
        assert_relative_eq!(p.team1_win, 0.43, epsilon = 1e-9);
        assert_relative_eq!(p.team2_win, 0.36, epsilon = 1e-9);
    }

    #[test]
    fn strong_home_side_against_unknown_visitor() {
        let home = stats(10, 25, 8, 20, 10);
        let p = estimate_probabilities(Some(&home), None);
        // 0.8733 / 1.6733 and 0.5 / 1.6733
        assert_relative_eq!(p.team1_win, 0.52, epsilon = 1e-9);
        assert_relative_eq!(p.team2_win, 0.30, epsilon = 1e-9);
        assert!(p.team1_win + p.team2_win < 1.0, "draw share must stay implied");
    }

    #[test]
    fn clamp_is_not_renormalised() {
        let weak = stats(10, 0, 0, 5, -30);
        let strong = stats(10, 30, 10, 30, 25);
        let (home, away) = win_probabilities(team_strength(Some(&strong)), team_strength(Some(&weak)));
        // Raw away share is 0.1 / 1.4 ≈ 0.071, lifted to the floor.
        assert_relative_eq!(away, 0.15, epsilon = 1e-12);
        assert_relative_eq!(home, 1.0 / 1.4, epsilon = 1e-12);
    }

    #[test]
    fn win_probabilities_stay_in_bounds() {
        let grid = [0.1, 0.2, 0.35, 0.5, 0.65, 0.8, 0.9];
        for h in grid {
            for a in grid {
                let (home, away) = win_probabilities(h, a);
                assert!((0.15..=0.75).contains(&home), "home {} for {}/{}", home, h, a);
                assert!((0.15..=0.75).contains(&away), "away {} for {}/{}", away, h, a);
            }
        }
    }

    // ── Goal markets ─────────────────────────────────────────────────────────

    #[test]
    fn default_scoring_rates_give_three_expected_goals() {
        let p = estimate_probabilities(None, None);
        // over 1.5 = 0.6 + 1.5*0.15 = 0.825 before rounding
        assert!((p.over_1_5 - 0.825).abs() <= 0.0051, "over1_5 = {}", p.over_1_5);
        assert_relative_eq!(p.over_2_5, 0.46, epsilon = 1e-9);
        // first half: 1.8 expected
        assert_relative_eq!(p.first_half_over_0_5, 0.86, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_under_1_5, 0.52, epsilon = 1e-9);
    }

    #[test]
    fn scoring_rate_comes_from_goals_for() {
        let home = stats(10, 25, 8, 20, 10);
        let p = estimate_probabilities(Some(&home), None);
        // 2.0 + 1.5 = 3.5 expected
        assert_relative_eq!(p.over_1_5, 0.9, epsilon = 1e-9);
        assert_relative_eq!(p.under_1_5, 0.1, epsilon = 1e-9);
        assert_relative_eq!(p.over_2_5, 0.52, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_over_0_5, 0.9, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_under_1_5, 0.49, epsilon = 1e-9);
    }

    #[test]
    fn goalless_sides_use_low_branches() {
        let blank = stats(6, 2, 0, 0, -8);
        let p = estimate_probabilities(Some(&blank), Some(&blank));
        assert_relative_eq!(p.over_1_5, 0.4, epsilon = 1e-9);
        assert_relative_eq!(p.under_1_5, 0.6, epsilon = 1e-9);
        assert_relative_eq!(p.over_2_5, 0.25, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_over_0_5, 0.5, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_under_1_5, 0.7, epsilon = 1e-9);
    }

    #[test]
    fn goal_markets_saturate_for_huge_scoring_rates() {
        let goal_machine = stats(1, 3, 1, 1000, 999);
        let p = estimate_probabilities(Some(&goal_machine), Some(&goal_machine));
        assert_relative_eq!(p.over_1_5, 0.95, epsilon = 1e-9);
        assert_relative_eq!(p.under_1_5, 0.05, epsilon = 1e-9);
        assert_relative_eq!(p.over_2_5, 0.85, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_over_0_5, 0.9, epsilon = 1e-9);
        assert_relative_eq!(p.first_half_under_1_5, 0.0, epsilon = 1e-9);
        assert!(in_unit_range(&p));
    }

    #[test]
    fn under_and_over_one_and_a_half_are_complementary() {
        for goals_for in [0u32, 3, 7, 11, 15, 19, 24, 33, 47, 80] {
            for played in [1u32, 4, 10, 23] {
                let s = stats(played, played as i32, 0, goals_for, 0);
                let p = estimate_probabilities(Some(&s), None);
                assert_relative_eq!(p.over_1_5 + p.under_1_5, 1.0, epsilon = 1e-9);
                assert!(in_unit_range(&p), "{:?}", p);
            }
        }
    }

    #[test]
    fn every_market_is_a_probability_along_the_goal_curve() {
        let mut expected = 0.0;
        while expected <= 40.0 {
            let m = GoalMarkets::from_expected(expected);
            for v in [m.over_1_5, m.over_2_5, m.first_half_over_0_5, m.first_half_under_1_5] {
                assert!((0.0..=1.0).contains(&v), "{} at {}", v, expected);
            }
            assert!(m.over_1_5 <= 0.95 && m.over_2_5 <= 0.85);
            assert!(m.first_half_over_0_5 <= 0.9 && m.first_half_under_1_5 <= 0.9);
            expected += 0.25;
        }
    }

    // ── Misc ─────────────────────────────────────────────────────────────────

    #[test]
    fn estimates_are_repeatable() {
        let home = stats(9, 14, 4, 13, 2);
        let away = stats(9, 11, 3, 10, -1);
        assert_eq!(
            estimate_probabilities(Some(&home), Some(&away)),
            estimate_probabilities(Some(&home), Some(&away))
        );
    }

    #[test]
    fn fixture_lookup_uses_team_ids() {
        let mut standings = StandingsMap::new();
        standings.insert(57, stats(10, 25, 8, 20, 10));

        let fixture = Fixture {
            id: 1,
            status: "TIMED".into(),
            home_team: Some(TeamRef { id: Some(57), ..Default::default() }),
            // Not in the table: treated as unknown
            away_team: Some(TeamRef { id: Some(999), ..Default::default() }),
            probabilities: None,
            extra: Default::default(),
        };
        assert_eq!(
            estimate_fixture(&fixture, &standings),
            estimate_probabilities(standings.get(&57), None)
        );

        let undecided = Fixture { home_team: Some(TeamRef::default()), away_team: None, ..fixture };
        assert_eq!(estimate_fixture(&undecided, &standings), estimate_probabilities(None, None));
    }

    #[test]
    fn rounding_is_two_places_half_away_from_zero() {
        assert_relative_eq!(round2(0.4615), 0.46, epsilon = 1e-12);
        assert_relative_eq!(round2(0.126), 0.13, epsilon = 1e-12);
        assert_relative_eq!(round2(0.375), 0.38, epsilon = 1e-12);
        assert_relative_eq!(round2(0.0), 0.0, epsilon = 1e-12);
    }
}
