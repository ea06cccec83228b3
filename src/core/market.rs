//! Externally supplied market prices

use super::odds::is_valid_american;
use serde::{Deserialize, Serialize};

/// Sportsbook lines for one game. Every field is optional.
///
/// `spread` is home-relative: `-3.5` means the home side gives 3.5 points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketLine {
    #[serde(default)]
    pub home_moneyline: Option<f64>,
    #[serde(default)]
    pub away_moneyline: Option<f64>,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub home_spread_price: Option<f64>,
    #[serde(default)]
    pub away_spread_price: Option<f64>,
    #[serde(default)]
    pub over_price: Option<f64>,
    #[serde(default)]
    pub under_price: Option<f64>,
}

impl MarketLine {
    /// True when no line at all was supplied
    pub fn is_empty(&self) -> bool {
        self.home_moneyline.is_none()
            && self.away_moneyline.is_none()
            && self.spread.is_none()
            && self.total.is_none()
    }

    /// Names of price fields that are not valid American odds
    pub fn invalid_prices(&self) -> Vec<&'static str> {
        [
            ("homeMoneyline", self.home_moneyline),
            ("awayMoneyline", self.away_moneyline),
            ("homeSpreadPrice", self.home_spread_price),
            ("awaySpreadPrice", self.away_spread_price),
            ("overPrice", self.over_price),
            ("underPrice", self.under_price),
        ]
        .into_iter()
        .filter_map(|(name, price)| match price {
            Some(p) if !is_valid_american(p) => Some(name),
            _ => None,
        })
        .collect()
    }

    /// Spread and total must be finite; a total must be positive
    pub fn invalid_points(&self) -> Vec<&'static str> {
        let mut bad = Vec::new();
        if matches!(self.spread, Some(s) if !s.is_finite()) {
            bad.push("spread");
        }
        if matches!(self.total, Some(t) if !t.is_finite() || t <= 0.0) {
            bad.push("total");
        }
        bad
    }
}
