use serde::{Deserialize, Serialize};

use crate::core::edges::{MoneylineEdge, SpreadEdge, TotalEdge};
use crate::core::injury::PlayerInjury;
use crate::core::kelly::BetSizing;
use crate::core::league::League;
use crate::core::market::MarketLine;
use crate::core::resolver::RatingSource;
use crate::data::stats::TeamStatRecord;

/// Matchup prediction request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictRequest {
    /// League code; unknown codes fall back to NBA
    pub league: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub neutral_site: bool,
    pub home_major_injury: bool,
    pub home_minor_injury: bool,
    pub away_major_injury: bool,
    pub away_minor_injury: bool,
    pub home_injuries: Vec<PlayerInjury>,
    pub away_injuries: Vec<PlayerInjury>,
    pub market: Option<MarketLine>,
    /// Trial count override
    pub simulations: Option<u64>,
    pub bankroll: Option<f64>,
}

/// Per-market edge detail; absent markets serialize as `null`
#[derive(Debug, Clone, Default, Serialize)]
pub struct EdgesBreakdown {
    pub moneyline: Option<MoneylineEdge>,
    pub spread: Option<SpreadEdge>,
    pub total: Option<TotalEdge>,
}

/// Matchup prediction response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// `"<away> @ <home>"`
    pub matchup: String,
    pub home_team: String,
    pub away_team: String,
    pub league: League,
    pub projected_home_score: u32,
    pub projected_away_score: u32,
    pub projected_score: String,
    /// Projected home margin
    pub model_spread: i64,
    /// Home win probability, `"NN.NN%"`
    pub win_probability: String,
    pub edge: String,
    pub recommended_bet: String,
    pub edges: EdgesBreakdown,
    pub simulations: u64,
    pub data_source: RatingSource,
    pub explanation: String,
    pub sizing: Option<BetSizing>,
}

/// One game of a slate sweep
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlateGame {
    pub league: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub neutral_site: bool,
}

/// Slate sweep request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlateRequest {
    pub games: Vec<SlateGame>,
    pub simulations: Option<u64>,
    pub limit: Option<usize>,
}

/// Slate sweep result for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlateEntry {
    pub league: League,
    pub home_team: String,
    pub away_team: String,
    pub projected_home_score: u32,
    pub projected_away_score: u32,
    pub home_win_probability: String,
    /// Home edge vs a generic -110 price, percentage points
    pub edge_pct: f64,
    pub edge_text: String,
    pub recommended_bet: String,
}

/// Query for the team lookup endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamStatsQuery {
    pub league: Option<String>,
    pub team: Option<String>,
}

/// Team lookup response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStatsResponse {
    pub league: League,
    /// Key of the matched team in the league table
    pub team: String,
    pub stats: TeamStatRecord,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub stats_loaded: Vec<League>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
