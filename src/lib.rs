//! Edgeline - Monte Carlo matchup projections for team sports
//!
//! This library provides:
//! - Expected-score resolution from team statistics or deterministic pseudo-ratings
//! - A parallel Monte Carlo simulator of final scores
//! - Moneyline, spread and total edges against market prices
//! - Kelly criterion bet sizing
//!
//! # Example
//!
//! ```no_run
//! use edgeline::core::League;
//! use edgeline::data::StatsDirectory;
//! use edgeline::predictor::{Matchup, MatchupPredictor};
//!
//! let predictor = MatchupPredictor::new(StatsDirectory::load("data"));
//! let response = predictor.predict(&Matchup::new(League::Nba, "Lakers", "Celtics", 100_000));
//! println!("{}: {}", response.matchup, response.recommended_bet);
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod predictor;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use config::{ConfigError, ServerConfig};
pub use models::{PredictRequest, PredictResponse, SlateEntry, SlateGame, SlateRequest};
pub use predictor::{Matchup, MatchupPredictor};
