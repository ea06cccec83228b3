//! League profiles and model constants
//!
//! Each supported league carries a static scoring profile used when no
//! statistics table overrides it, plus the tables that shape pseudo-ratings
//! and clamp expected scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported league codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum League {
    Nba,
    Nfl,
    Nhl,
    Mlb,
    Ncaab,
    Ncaaf,
}

impl League {
    pub const ALL: [League; 6] = [
        League::Nba,
        League::Nfl,
        League::Nhl,
        League::Mlb,
        League::Ncaab,
        League::Ncaaf,
    ];

    /// Parse a league code case-insensitively.
    ///
    /// Unknown or blank codes resolve to the NBA, matching how the
    /// projection endpoints treat them.
    pub fn parse_or_default(code: &str) -> League {
        League::from_code(code).unwrap_or(League::Nba)
    }

    /// Strict parse; `None` for unknown codes
    pub fn from_code(code: &str) -> Option<League> {
        match code.trim().to_ascii_uppercase().as_str() {
            "NBA" => Some(League::Nba),
            "NFL" => Some(League::Nfl),
            "NHL" => Some(League::Nhl),
            "MLB" => Some(League::Mlb),
            "NCAAB" => Some(League::Ncaab),
            "NCAAF" => Some(League::Ncaaf),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            League::Nba => "NBA",
            League::Nfl => "NFL",
            League::Nhl => "NHL",
            League::Mlb => "MLB",
            League::Ncaab => "NCAAB",
            League::Ncaaf => "NCAAF",
        }
    }

    /// Static scoring profile for the league
    pub fn profile(self) -> LeagueProfile {
        match self {
            League::Nba => LeagueProfile::new(117.2, 13.5, 3.4),
            League::Nfl => LeagueProfile::new(23.4, 11.8, 2.7),
            League::Ncaab => LeagueProfile::new(73.8, 13.2, 4.3),
            League::Ncaaf => LeagueProfile::new(29.6, 14.8, 3.5),
            League::Nhl => LeagueProfile::new(3.08, 2.1, 0.38),
            League::Mlb => LeagueProfile::new(4.58, 3.4, 0.42),
        }
    }

    /// Half-width of the pseudo-rating ranges around 1.0
    pub fn rating_spread(self) -> RatingSpread {
        match self {
            League::Nba => RatingSpread::new(0.12, 0.10, 0.10),
            League::Nfl => RatingSpread::new(0.18, 0.16, 0.12),
            League::Ncaab => RatingSpread::new(0.15, 0.14, 0.12),
            League::Ncaaf => RatingSpread::new(0.22, 0.20, 0.16),
            League::Nhl => RatingSpread::new(0.10, 0.10, 0.08),
            League::Mlb => RatingSpread::new(0.18, 0.16, 0.10),
        }
    }

    /// Upper bound for an expected score, as a multiple of the base ppg
    pub fn max_factor(self) -> f64 {
        match self {
            League::Nhl | League::Mlb => 3.0,
            League::Nba | League::Ncaaf => 2.4,
            League::Nfl => 2.2,
            League::Ncaab => 2.1,
        }
    }

    /// Relative weight of an injured player at `position` (upper-cased).
    pub fn position_weight(self, position: &str) -> f64 {
        let pos = position.trim().to_ascii_uppercase();
        match self {
            League::Nfl | League::Ncaaf => match pos.as_str() {
                "QB" => 0.18,
                "RB" | "WR" | "TE" => 0.05,
                "OL" | "LT" | "RT" | "C" | "G" => 0.03,
                "DL" | "DE" | "DT" | "LB" | "CB" | "S" => 0.03,
                "K" | "P" => 0.01,
                _ => 0.03,
            },
            League::Nba | League::Ncaab => match pos.as_str() {
                "PG" | "SG" | "G" => 0.07,
                "SF" | "PF" | "F" => 0.06,
                "C" => 0.06,
                _ => 0.05,
            },
            League::Nhl => match pos.as_str() {
                "G" => 0.12,
                "C" | "LW" | "RW" | "F" => 0.04,
                "D" => 0.03,
                _ => 0.03,
            },
            League::Mlb => match pos.as_str() {
                "SP" => 0.10,
                "RP" => 0.02,
                "C" | "1B" | "2B" | "3B" | "SS" | "LF" | "CF" | "RF" | "DH" => 0.03,
                _ => 0.03,
            },
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// League-wide scoring baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueProfile {
    /// Average points per team per game
    pub ppg: f64,
    /// Standard deviation of a team's points
    pub sd: f64,
    /// Home-field advantage in points
    pub home_adv: f64,
}

impl LeagueProfile {
    pub const fn new(ppg: f64, sd: f64, home_adv: f64) -> Self {
        Self { ppg, sd, home_adv }
    }
}

/// Pseudo-rating spreads for offense, defense and pace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSpread {
    pub offense: f64,
    pub defense: f64,
    pub pace: f64,
}

impl RatingSpread {
    pub const fn new(offense: f64, defense: f64, pace: f64) -> Self {
        Self {
            offense,
            defense,
            pace,
        }
    }
}

/// Tunable constants of the projection model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Multiplier on the home team's expected score away from neutral sites
    pub home_scoring_boost: f64,
    /// Weight of the rating model when blending with a home/away ppg split
    pub split_blend: f64,
    /// How strongly a pseudo defense rating suppresses opponent scoring
    pub pseudo_defense_weight: f64,
    /// Lower end of the matchup volatility multiplier
    pub volatility_floor: f64,
    /// Width of the matchup volatility multiplier range
    pub volatility_range: f64,
    /// Break-even probability for a standard -110 price
    pub default_break_even: f64,
    /// Simulated scores are clamped to `base_ppg * score_clamp_factor`
    pub score_clamp_factor: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            home_scoring_boost: 1.04,
            split_blend: 0.6,
            pseudo_defense_weight: 0.6,
            volatility_floor: 0.85,
            volatility_range: 0.4,
            default_break_even: 0.524,
            score_clamp_factor: 3.0,
        }
    }
}
