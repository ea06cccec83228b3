//! Injury adjustments
//!
//! Converts injury flags and per-position severities into a scoring
//! `impact` (fraction of expected points lost) and a `volatility` bump
//! applied to the score distribution.

use super::league::League;
use serde::{Deserialize, Serialize};

const MAX_IMPACT: f64 = 0.6;
const MAX_VOLATILITY: f64 = 0.5;

const MAJOR_IMPACT: f64 = 0.06;
const MAJOR_VOLATILITY: f64 = 0.08;
const MINOR_IMPACT: f64 = 0.02;
const MINOR_VOLATILITY: f64 = 0.03;

/// Player availability, as a status word or a raw fraction in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Severity {
    Value(f64),
    Status(String),
}

impl Severity {
    /// Fraction of the player's contribution that is lost
    pub fn fraction(&self) -> f64 {
        match self {
            Severity::Value(v) if v.is_finite() => v.clamp(0.0, 1.0),
            Severity::Value(_) => 0.0,
            Severity::Status(s) => match s.trim().to_ascii_lowercase().as_str() {
                "out" | "ir" | "injured reserve" => 1.0,
                "doubtful" => 0.75,
                "questionable" | "day-to-day" | "gtd" => 0.4,
                "probable" => 0.1,
                _ => 0.0,
            },
        }
    }
}

/// One injured player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInjury {
    pub position: String,
    pub severity: Severity,
}

/// Everything known about one side's injuries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjuryReport {
    pub major: bool,
    pub minor: bool,
    pub players: Vec<PlayerInjury>,
}

impl InjuryReport {
    pub fn from_flags(major: bool, minor: bool) -> Self {
        Self {
            major,
            minor,
            players: Vec::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<PlayerInjury>) -> Self {
        self.players = players;
        self
    }

    /// Weight the report for `league`
    pub fn adjustment(&self, league: League) -> InjuryAdjustment {
        let mut impact = 0.0;
        let mut volatility = 0.0;

        if self.major {
            impact += MAJOR_IMPACT;
            volatility += MAJOR_VOLATILITY;
        }
        if self.minor {
            impact += MINOR_IMPACT;
            volatility += MINOR_VOLATILITY;
        }

        for player in &self.players {
            let weighted = league.position_weight(&player.position) * player.severity.fraction();
            impact += weighted;
            volatility += 0.5 * weighted;
        }

        InjuryAdjustment {
            impact: impact.clamp(0.0, MAX_IMPACT),
            volatility: volatility.clamp(0.0, MAX_VOLATILITY),
        }
    }
}

/// Per-request injury effect on one team
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InjuryAdjustment {
    /// Fraction of expected points removed, in [0, 0.6]
    pub impact: f64,
    /// Extra relative spread of the score distribution
    pub volatility: f64,
}

impl InjuryAdjustment {
    pub const NONE: InjuryAdjustment = InjuryAdjustment {
        impact: 0.0,
        volatility: 0.0,
    };

    /// Multiplier applied to the team's expected score
    pub fn scoring_factor(&self) -> f64 {
        1.0 - self.impact
    }
}
