//! Expected-value resolver
//!
//! Turns a league and two team names into expected point totals and a
//! shared standard deviation. Real team statistics are used when both teams
//! have them; otherwise hash-derived pseudo-ratings stand in.

use super::injury::{InjuryAdjustment, InjuryReport};
use super::league::{League, ModelParams};
use super::ratings::{volatility_seed, PseudoRating};
use crate::data::stats::{LeagueTable, TeamLookup, TeamStatRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Per-request modifiers
#[derive(Debug, Clone, Default)]
pub struct MatchupOptions {
    /// Removes every home-advantage term when true
    pub neutral_site: bool,
    pub home_injuries: InjuryReport,
    pub away_injuries: InjuryReport,
}

/// Where the team ratings came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RatingSource {
    TeamStats,
    PseudoRatings,
}

/// Score distribution parameters for one matchup
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupProjection {
    pub league: League,
    pub expected_home: f64,
    pub expected_away: f64,
    /// Shared by both teams' score distributions
    pub sd: f64,
    pub base_ppg: f64,
    /// Largest score the simulator may produce
    pub score_cap: u32,
    pub pace_factor: f64,
    pub source: RatingSource,
}

struct RawExpectation {
    home: f64,
    away: f64,
    pace_factor: f64,
    source: RatingSource,
}

/// Resolve the expected scores of `home` vs `away`.
///
/// `table` is the league's statistics snapshot, if any. Missing or unusable
/// statistics never fail; they route to the pseudo-rating path.
pub fn resolve(
    league: League,
    home: &str,
    away: &str,
    options: &MatchupOptions,
    table: Option<&LeagueTable>,
    params: &ModelParams,
) -> MatchupProjection {
    let profile = league.profile();
    let base_ppg = table.and_then(LeagueTable::base_ppg).unwrap_or(profile.ppg);
    let base_sd = table.and_then(LeagueTable::base_sd).unwrap_or(profile.sd);
    let home_adv = if options.neutral_site {
        0.0
    } else {
        profile.home_adv
    };

    let home_injury = options.home_injuries.adjustment(league);
    let away_injury = options.away_injuries.adjustment(league);

    let raw = table
        .and_then(|t| {
            from_team_stats(t, league, home, away, base_ppg, options.neutral_site, params)
        })
        .unwrap_or_else(|| from_pseudo_ratings(league, home, away, base_ppg, params));

    let expected_home = (raw.home + home_adv) * home_injury.scoring_factor();
    let expected_away = (raw.away - home_adv) * away_injury.scoring_factor();

    let sd = base_sd
        * sd_adjustment(
            league,
            home,
            away,
            raw.pace_factor,
            home_injury,
            away_injury,
            params,
        );

    let max_score = base_ppg * league.max_factor();
    let projection = MatchupProjection {
        league,
        expected_home: clamp_expected(expected_home, max_score, base_ppg),
        expected_away: clamp_expected(expected_away, max_score, base_ppg),
        sd,
        base_ppg,
        score_cap: score_cap(base_ppg, params.score_clamp_factor),
        pace_factor: raw.pace_factor,
        source: raw.source,
    };

    debug!(
        league = %league,
        home,
        away,
        source = ?projection.source,
        expected_home = projection.expected_home,
        expected_away = projection.expected_away,
        sd = projection.sd,
        "resolved matchup"
    );

    projection
}

/// Simulated score ceiling, saturating at `u32::MAX` for absurd bases
fn score_cap(base_ppg: f64, factor: f64) -> u32 {
    let cap = (base_ppg * factor).floor();
    if cap >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        cap.max(0.0) as u32
    }
}

fn usable_team<'a>(
    table: &'a LeagueTable,
    league: League,
    name: &str,
) -> Option<&'a TeamStatRecord> {
    match table.lookup(name) {
        TeamLookup::Usable(record) => Some(record),
        TeamLookup::Unusable => {
            warn!("Ignoring unusable ratings for {} ({})", name, league);
            None
        }
        TeamLookup::Missing => None,
    }
}

fn from_team_stats(
    table: &LeagueTable,
    league: League,
    home: &str,
    away: &str,
    base_ppg: f64,
    neutral_site: bool,
    params: &ModelParams,
) -> Option<RawExpectation> {
    // Both sides are checked so each bad record gets its own warning
    let home_stats = usable_team(table, league, home);
    let away_stats = usable_team(table, league, away);
    let (home_stats, away_stats) = (home_stats?, away_stats?);
    let (avg_off, avg_def) = table.rating_averages()?;
    let (home_off, home_def) = home_stats.ratings()?;
    let (away_off, away_def) = away_stats.ratings()?;

    let pace_factor = (home_stats.pace_or_neutral() + away_stats.pace_or_neutral()) / 200.0;
    let boost = if neutral_site {
        1.0
    } else {
        params.home_scoring_boost
    };

    let mut home_pts = base_ppg * (home_off / avg_off) * (avg_def / away_def) * pace_factor * boost;
    let mut away_pts = base_ppg * (away_off / avg_off) * (avg_def / home_def) * pace_factor;

    // Venue splits only mean something when there is a venue
    if !neutral_site {
        if let Some(split) = home_stats.home_split() {
            home_pts = params.split_blend * home_pts + (1.0 - params.split_blend) * split;
        }
        if let Some(split) = away_stats.away_split() {
            away_pts = params.split_blend * away_pts + (1.0 - params.split_blend) * split;
        }
    }

    Some(RawExpectation {
        home: home_pts,
        away: away_pts,
        pace_factor,
        source: RatingSource::TeamStats,
    })
}

fn from_pseudo_ratings(
    league: League,
    home: &str,
    away: &str,
    base_ppg: f64,
    params: &ModelParams,
) -> RawExpectation {
    let home_rating = PseudoRating::for_team(league, home);
    let away_rating = PseudoRating::for_team(league, away);

    // Defense above 1.0 shrinks the opponent's scoring
    let home_def_factor = 1.0 - (home_rating.defense - 1.0) * params.pseudo_defense_weight;
    let away_def_factor = 1.0 - (away_rating.defense - 1.0) * params.pseudo_defense_weight;
    let pace_factor = (home_rating.pace + away_rating.pace) / 2.0;

    RawExpectation {
        home: base_ppg * home_rating.offense * away_def_factor * pace_factor,
        away: base_ppg * away_rating.offense * home_def_factor * pace_factor,
        pace_factor,
        source: RatingSource::PseudoRatings,
    }
}

fn sd_adjustment(
    league: League,
    home: &str,
    away: &str,
    pace_factor: f64,
    home_injury: InjuryAdjustment,
    away_injury: InjuryAdjustment,
    params: &ModelParams,
) -> f64 {
    let seed = volatility_seed(league, home, away);
    let mut adjust = params.volatility_floor + seed * params.volatility_range;
    adjust *= 1.0 + (pace_factor - 1.0).max(0.0);
    adjust *= 1.0 + (home_injury.volatility + away_injury.volatility) / 2.0;
    adjust
}

fn clamp_expected(value: f64, max_score: f64, fallback: f64) -> f64 {
    let value = if value.is_finite() { value } else { fallback };
    value.clamp(0.0, max_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::TeamStatRecord;
    use std::collections::BTreeMap;

    fn record(off: f64, def: f64, pace: Option<f64>) -> TeamStatRecord {
        TeamStatRecord {
            off_rating: Some(off),
            def_rating: Some(def),
            pace,
            ..Default::default()
        }
    }

    fn nba_table() -> LeagueTable {
        let mut teams = BTreeMap::new();
        teams.insert("Lakers".to_string(), record(118.0, 110.0, Some(100.0)));
        teams.insert("Celtics".to_string(), record(112.0, 112.0, Some(100.0)));
        teams.insert("Pistons".to_string(), record(106.0, 118.0, Some(100.0)));
        LeagueTable {
            teams,
            ..Default::default()
        }
    }

    fn resolve_default(
        league: League,
        home: &str,
        away: &str,
        options: &MatchupOptions,
        table: Option<&LeagueTable>,
    ) -> MatchupProjection {
        resolve(league, home, away, options, table, &ModelParams::default())
    }

    #[test]
    fn test_pseudo_path_is_deterministic() {
        let options = MatchupOptions::default();
        let a = resolve_default(League::Nba, "Lakers", "Celtics", &options, None);
        let b = resolve_default(League::Nba, "Lakers", "Celtics", &options, None);
        assert_eq!(a, b);
        assert_eq!(a.source, RatingSource::PseudoRatings);
    }

    #[test]
    fn test_unknown_teams_fall_back_to_pseudo_ratings() {
        let table = nba_table();
        let p = resolve_default(
            League::Nba,
            "Lakers",
            "Team That Does Not Exist",
            &MatchupOptions::default(),
            Some(&table),
        );
        assert_eq!(p.source, RatingSource::PseudoRatings);
        assert!(p.expected_home > 0.0 && p.expected_away > 0.0);
    }

    #[test]
    fn test_real_stats_path() {
        let table = nba_table();
        let p = resolve_default(
            League::Nba,
            "Lakers",
            "Pistons",
            &MatchupOptions::default(),
            Some(&table),
        );
        assert_eq!(p.source, RatingSource::TeamStats);
        assert!(p.expected_home > p.expected_away);

        // avg off 112, avg def 113.33; Lakers offense vs Pistons defense
        let avg_def = (110.0 + 112.0 + 118.0) / 3.0;
        let expected = 117.2 * (118.0 / 112.0) * (avg_def / 118.0) * 1.04 + 3.4;
        assert!((p.expected_home - expected).abs() < 1e-9);
    }

    #[test]
    fn test_home_split_blend() {
        let mut table = nba_table();
        if let Some(lakers) = table.teams.get_mut("Lakers") {
            lakers.home_ppg = Some(130.0);
        }
        let plain = resolve_default(
            League::Nba,
            "Lakers",
            "Celtics",
            &MatchupOptions::default(),
            Some(&nba_table()),
        );
        let blended = resolve_default(
            League::Nba,
            "Lakers",
            "Celtics",
            &MatchupOptions::default(),
            Some(&table),
        );
        let raw = plain.expected_home - 3.4;
        let expected = 0.6 * raw + 0.4 * 130.0 + 3.4;
        assert!((blended.expected_home - expected).abs() < 1e-9);

        // Neutral site: no boost, no home advantage and no venue split
        let neutral = resolve_default(
            League::Nba,
            "Lakers",
            "Celtics",
            &MatchupOptions {
                neutral_site: true,
                ..Default::default()
            },
            Some(&table),
        );
        let avg_def = (110.0 + 112.0 + 118.0) / 3.0;
        let expected = 117.2 * (118.0 / 112.0) * (avg_def / 112.0);
        assert!((neutral.expected_home - expected).abs() < 1e-9);
        let expected_away = 117.2 * (112.0 / 112.0) * (avg_def / 110.0);
        assert!((neutral.expected_away - expected_away).abs() < 1e-9);
    }

    #[test]
    fn test_unusable_ratings_fall_back_to_pseudo_ratings() {
        let mut table = nba_table();
        table
            .teams
            .insert("Hornets".to_string(), record(0.0, 115.0, Some(100.0)));
        let options = MatchupOptions::default();
        let p = resolve_default(League::Nba, "Lakers", "Hornets", &options, Some(&table));
        assert_eq!(p.source, RatingSource::PseudoRatings);

        let pseudo = resolve_default(League::Nba, "Lakers", "Hornets", &options, None);
        assert_eq!(p.expected_home, pseudo.expected_home);
        assert_eq!(p.expected_away, pseudo.expected_away);
    }

    #[test]
    fn test_score_cap_saturates() {
        let mut table = nba_table();
        table.avg_points = Some(3.0e9);
        let p = resolve_default(
            League::Nba,
            "Lakers",
            "Celtics",
            &MatchupOptions::default(),
            Some(&table),
        );
        assert_eq!(p.score_cap, u32::MAX);
        assert_eq!(score_cap(117.2, 3.0), 351);
        assert_eq!(score_cap(-5.0, 3.0), 0);
    }

    #[test]
    fn test_fast_pace_widens_sd() {
        let mut fast = nba_table();
        for team in fast.teams.values_mut() {
            team.pace = Some(120.0);
        }
        let options = MatchupOptions::default();
        let table = nba_table();
        let normal = resolve_default(League::Nba, "Lakers", "Celtics", &options, Some(&table));
        let quick = resolve_default(League::Nba, "Lakers", "Celtics", &options, Some(&fast));

        assert!((quick.pace_factor - 1.2).abs() < 1e-12);
        assert!(quick.sd >= 13.5 * 0.85 * 1.2 - 1e-9);
        assert!(quick.sd > normal.sd);
        assert!((quick.sd - normal.sd * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_neutral_site_removes_home_advantage() {
        let home_field = resolve_default(
            League::Nfl,
            "Chiefs",
            "Bills",
            &MatchupOptions::default(),
            None,
        );
        let neutral = resolve_default(
            League::Nfl,
            "Chiefs",
            "Bills",
            &MatchupOptions {
                neutral_site: true,
                ..Default::default()
            },
            None,
        );
        assert!((home_field.expected_home - neutral.expected_home - 2.7).abs() < 1e-9);
        assert!((neutral.expected_away - home_field.expected_away - 2.7).abs() < 1e-9);
    }

    #[test]
    fn test_injuries_lower_scoring_and_widen_sd() {
        let healthy = resolve_default(
            League::Nba,
            "Lakers",
            "Celtics",
            &MatchupOptions::default(),
            None,
        );
        let hurt = resolve_default(
            League::Nba,
            "Lakers",
            "Celtics",
            &MatchupOptions {
                home_injuries: InjuryReport::from_flags(true, false),
                ..Default::default()
            },
            None,
        );
        assert!((hurt.expected_home - healthy.expected_home * 0.94).abs() < 1e-9);
        assert_eq!(hurt.expected_away, healthy.expected_away);
        assert!(hurt.sd > healthy.sd);
    }

    #[test]
    fn test_sd_within_volatility_band() {
        for (home, away) in [("Lakers", "Celtics"), ("Knicks", "Nets"), ("Heat", "Magic")] {
            let p = resolve_default(League::Nba, home, away, &MatchupOptions::default(), None);
            let pace_bump = 1.0 + (p.pace_factor - 1.0).max(0.0);
            assert!(p.sd >= 13.5 * 0.85 - 1e-9);
            assert!(p.sd <= 13.5 * 1.25 * pace_bump + 1e-9);
        }
    }

    #[test]
    fn test_expected_scores_are_clamped() {
        let mut teams = BTreeMap::new();
        teams.insert("Juggernaut".to_string(), record(10_000.0, 1.0, Some(300.0)));
        teams.insert("Cupcake".to_string(), record(1.0, 10_000.0, Some(300.0)));
        let table = LeagueTable {
            teams,
            ..Default::default()
        };
        let p = resolve_default(
            League::Ncaab,
            "Juggernaut",
            "Cupcake",
            &MatchupOptions::default(),
            Some(&table),
        );
        assert_eq!(p.expected_home, 73.8 * 2.1);
        assert!(p.expected_away >= 0.0);
    }

    #[test]
    fn test_table_overrides_base_profile() {
        let mut table = nba_table();
        table.avg_points = Some(100.0);
        table.std_dev_points = Some(10.0);
        let p = resolve_default(
            League::Nba,
            "Unknown A",
            "Unknown B",
            &MatchupOptions::default(),
            Some(&table),
        );
        assert_eq!(p.base_ppg, 100.0);
        assert_eq!(p.score_cap, 300);
        assert!(p.sd < 10.0 * 1.25 * 1.2);
    }
}
