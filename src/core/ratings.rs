//! Deterministic pseudo-ratings
//!
//! When no statistics exist for a team, its offense, defense and pace are
//! derived from a hash of `LEAGUE:team name`. The same name always yields
//! the same rating, and different names almost always differ.

use super::league::{League, RatingSpread};

/// Divisor used to derive the defense sub-seed
const DEFENSE_STRIDE: u32 = 9973;
/// Divisor used to derive the pace sub-seed
const PACE_STRIDE: u32 = 31337;

/// Polynomial rolling hash (base 31) over UTF-16 code units, mod 2^32
pub fn string_hash(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// Map a seed into `[1 - spread, 1 + spread)`
fn centered_multiplier(seed: u32, spread: f64) -> f64 {
    let r = f64::from(seed % 2000) / 1000.0 - 1.0;
    1.0 + r * spread
}

/// Hash-derived team multipliers, all centered on 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoRating {
    pub offense: f64,
    /// Above 1.0 means a better defense
    pub defense: f64,
    pub pace: f64,
}

impl PseudoRating {
    pub fn for_team(league: League, team: &str) -> Self {
        let base = string_hash(&format!("{}:{}", league.code(), team));
        Self::from_seed(base, league.rating_spread())
    }

    fn from_seed(base: u32, spread: RatingSpread) -> Self {
        Self {
            offense: centered_multiplier(base, spread.offense),
            defense: centered_multiplier(base / DEFENSE_STRIDE, spread.defense),
            pace: centered_multiplier(base / PACE_STRIDE, spread.pace),
        }
    }
}

/// Matchup volatility seed in `[0, 1)` for a specific pairing
pub fn volatility_seed(league: League, home: &str, away: &str) -> f64 {
    let mash = string_hash(&format!("{}|{}|{}", home, away, league.code()));
    f64::from(mash % 1000) / 1000.0
}
