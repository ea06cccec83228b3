//! Core projection engine: resolver, simulator, edge calculator

pub mod edges;
pub mod injury;
pub mod kelly;
pub mod league;
pub mod market;
pub mod odds;
pub mod ratings;
pub mod resolver;
pub mod simulator;

// Re-export commonly used types
pub use edges::{compute_edges, EdgeReport, RecommendedPlay};
pub use injury::{InjuryAdjustment, InjuryReport, PlayerInjury, Severity};
pub use kelly::{calculate_kelly_fraction, BetSizing, KellyCalculator};
pub use league::{League, LeagueProfile, ModelParams};
pub use market::MarketLine;
pub use resolver::{resolve, MatchupOptions, MatchupProjection, RatingSource};
pub use simulator::{SimulationResult, Simulator};
