//! American odds conversions
//!
//! Positive odds (+150) pay $150 on a $100 stake; negative odds (-150)
//! need a $150 stake to win $100.

/// Break-even probability of a standard -110 price
pub const STANDARD_BREAK_EVEN: f64 = 0.524;

/// Implied probability of American odds
///
/// # Examples
/// ```
/// use edgeline::core::odds::implied_probability;
/// assert!((implied_probability(-150.0) - 0.6).abs() < 1e-9);
/// assert!((implied_probability(150.0) - 0.4).abs() < 1e-9);
/// ```
pub fn implied_probability(odds: f64) -> f64 {
    if odds > 0.0 {
        100.0 / (odds + 100.0)
    } else {
        let abs = -odds;
        abs / (abs + 100.0)
    }
}

/// Fair American line for a win probability `p` in (0, 1)
///
/// Favorites (p >= 0.5) get a negative line, underdogs a positive one.
pub fn fair_line(p: f64) -> i64 {
    if p >= 0.5 {
        -((p / (1.0 - p)) * 100.0).round() as i64
    } else {
        (((1.0 - p) / p) * 100.0).round() as i64
    }
}

/// Decimal odds (total return per unit staked)
pub fn decimal_odds(odds: f64) -> f64 {
    if odds > 0.0 {
        1.0 + odds / 100.0
    } else {
        1.0 + 100.0 / -odds
    }
}

/// Break-even probability for an optional side price
pub fn break_even(price: Option<f64>, default: f64) -> f64 {
    price.map(implied_probability).unwrap_or(default)
}

/// Whether `odds` is a valid American price (|odds| >= 100)
pub fn is_valid_american(odds: f64) -> bool {
    odds.is_finite() && odds.abs() >= 100.0
}

/// Format a line with an explicit sign, e.g. `+130`, `-150`
pub fn format_american(odds: f64) -> String {
    if odds > 0.0 {
        format!("+{}", odds)
    } else {
        format!("{}", odds)
    }
}
