//! Kelly Criterion Bet Sizing
//!
//! Sizes the recommended play from its model probability and price.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b = (p*odds - 1) / (odds - 1)
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!     odds = decimal odds (e.g., 2.5 for +150)

use super::odds::decimal_odds;
use serde::{Deserialize, Serialize};

/// Bet sizing recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetSizing {
    pub probability: f64,
    pub decimal_odds: f64,
    pub expected_value: f64,
    pub kelly_fraction: f64,       // Full Kelly
    pub recommended_fraction: f64, // After multiplier and cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stake: Option<f64>, // Whole units, only with a bankroll
}

/// Calculate Kelly fraction for a single bet
///
/// # Arguments
/// * `probability` - Estimated probability of winning (0-1)
/// * `odds` - Decimal odds (e.g., 2.5 = 2.5x return)
///
/// # Returns
/// Kelly fraction (can be negative if EV < 1)
///
/// # Examples
/// ```
/// use edgeline::core::kelly::calculate_kelly_fraction;
/// let kelly = calculate_kelly_fraction(0.6, 2.0); // EV = 1.2
/// assert!((kelly - 0.2).abs() < 0.0001);
/// ```
pub fn calculate_kelly_fraction(probability: f64, odds: f64) -> f64 {
    if odds <= 1.0 {
        return 0.0;
    }

    // f* = (p * odds - 1) / (odds - 1)
    (probability * odds - 1.0) / (odds - 1.0)
}

/// Kelly criterion calculator
///
/// Fractional Kelly (default 1/4) with a cap on any single stake.
#[derive(Debug, Clone)]
pub struct KellyCalculator {
    pub kelly_multiplier: f64,
    pub max_stake_pct: f64,
}

impl KellyCalculator {
    pub fn new(kelly_multiplier: f64, max_stake_pct: f64) -> Self {
        Self {
            kelly_multiplier,
            max_stake_pct,
        }
    }

    /// Size a bet priced in American odds
    pub fn size_american(&self, probability: f64, american: f64, bankroll: Option<f64>) -> BetSizing {
        self.size(probability, decimal_odds(american), bankroll)
    }

    /// Size a bet priced in decimal odds
    pub fn size(&self, probability: f64, odds: f64, bankroll: Option<f64>) -> BetSizing {
        let kelly = calculate_kelly_fraction(probability, odds);
        let recommended = (kelly * self.kelly_multiplier).clamp(0.0, self.max_stake_pct);

        let stake = bankroll
            .filter(|b| b.is_finite() && *b > 0.0)
            .map(|b| (b * recommended).round());

        BetSizing {
            probability,
            decimal_odds: odds,
            expected_value: probability * odds,
            kelly_fraction: kelly,
            recommended_fraction: recommended,
            stake,
        }
    }
}

impl Default for KellyCalculator {
    fn default() -> Self {
        Self::new(0.25, 0.10)
    }
}
