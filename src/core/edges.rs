//! Market edge calculator
//!
//! Compares simulated probabilities with market break-even probabilities
//! and picks a single recommended play.
//!
//! Edge (in percentage points) = (model probability - break-even) * 100.
//! Moneyline break-even is the implied probability of the quoted price;
//! spread and total sides use their own price when given, else -110.

use super::market::MarketLine;
use super::odds::{break_even, fair_line, format_american, implied_probability};
use super::simulator::SimulationResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price assumed for spread and total sides without an explicit price
const STANDARD_PRICE: f64 = -110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketKind {
    Moneyline,
    Spread,
    Total,
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketKind::Moneyline => f.write_str("Moneyline"),
            MarketKind::Spread => f.write_str("Spread"),
            MarketKind::Total => f.write_str("Total"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Home,
    Away,
    Over,
    Under,
}

/// Moneyline comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneylineEdge {
    pub home_win_prob: f64,
    pub away_win_prob: f64,
    pub home_implied_prob: Option<f64>,
    pub away_implied_prob: Option<f64>,
    pub home_edge: Option<f64>,
    pub away_edge: Option<f64>,
    pub home_fair_line: Option<i64>,
    pub away_fair_line: Option<i64>,
}

/// Spread comparison; cover probabilities keep pushes in the denominator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadEdge {
    pub line: f64,
    pub home_cover_prob: f64,
    pub away_cover_prob: f64,
    pub push_prob: f64,
    pub home_break_even: f64,
    pub away_break_even: f64,
    pub home_edge: f64,
    pub away_edge: f64,
}

/// Totals comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalEdge {
    pub line: f64,
    pub over_prob: f64,
    pub under_prob: f64,
    pub push_prob: f64,
    pub over_break_even: f64,
    pub under_break_even: f64,
    pub over_edge: f64,
    pub under_edge: f64,
}

/// A single priced wager the model could recommend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCandidate {
    pub market: MarketKind,
    pub side: Side,
    /// Percentage points over break-even
    pub edge: f64,
    pub model_prob: f64,
    pub break_even: f64,
    /// American price of the wager
    pub price: f64,
    pub description: String,
}

impl EdgeCandidate {
    pub fn recommendation(&self) -> String {
        format!(
            "{} at {} (model {:.1}% vs {:.1}% break-even, edge {:+.2}%)",
            self.description,
            format_american(self.price),
            self.model_prob * 100.0,
            self.break_even * 100.0,
            self.edge
        )
    }
}

/// Confidence tier of a raw model lean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeanTier {
    Slight,
    Lean,
    Strong,
}

impl LeanTier {
    pub fn from_probability(p: f64) -> Self {
        if p < 0.55 {
            LeanTier::Slight
        } else if p <= 0.65 {
            LeanTier::Lean
        } else {
            LeanTier::Strong
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeanTier::Slight => "Slight lean",
            LeanTier::Lean => "Lean",
            LeanTier::Strong => "Strong lean",
        }
    }
}

/// The one statement returned to the user
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendedPlay {
    /// Highest positive market edge
    Market(EdgeCandidate),
    /// Favored side by raw win probability
    Lean {
        team: String,
        side: Side,
        win_probability: f64,
        tier: LeanTier,
        /// A market was supplied but showed no positive edge
        no_market_edge: bool,
    },
}

impl RecommendedPlay {
    pub fn text(&self) -> String {
        match self {
            RecommendedPlay::Market(candidate) => candidate.recommendation(),
            RecommendedPlay::Lean {
                team,
                win_probability,
                tier,
                no_market_edge,
                ..
            } => {
                let mut text = format!(
                    "{}: {} to win outright (model lean, {:.1}% win probability)",
                    tier.label(),
                    team,
                    win_probability * 100.0
                );
                if *no_market_edge {
                    text.push_str("; no strong market edge");
                }
                text
            }
        }
    }
}

/// Output of the edge calculator
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeReport {
    pub moneyline: Option<MoneylineEdge>,
    pub spread: Option<SpreadEdge>,
    pub total: Option<TotalEdge>,
    /// Every priced wager, in evaluation order
    pub candidates: Vec<EdgeCandidate>,
    pub recommended: RecommendedPlay,
    /// Edge vs the default break-even for the favored side, when no market was given
    pub baseline_edge: Option<f64>,
}

impl EdgeReport {
    /// One-line edge summary
    pub fn edge_text(&self) -> String {
        match (&self.recommended, self.baseline_edge) {
            (RecommendedPlay::Market(c), _) => format!("{:+.2}% edge: {}", c.edge, c.description),
            (RecommendedPlay::Lean { team, .. }, Some(edge)) if edge > 0.0 => {
                format!("{:+.2}% vs -110 break-even on {}", edge, team)
            }
            (RecommendedPlay::Lean { .. }, Some(_)) => "No strong edge vs -110 baseline".to_string(),
            (RecommendedPlay::Lean { .. }, None) => "No strong market edge".to_string(),
        }
    }
}

/// Highest positive edge; the first candidate wins exact ties
pub fn best_candidate(candidates: &[EdgeCandidate]) -> Option<&EdgeCandidate> {
    candidates
        .iter()
        .filter(|c| c.edge > 0.0)
        .fold(None, |best: Option<&EdgeCandidate>, c| match best {
            Some(b) if b.edge >= c.edge => Some(b),
            _ => Some(c),
        })
}

fn edge_pct(model: f64, break_even: f64) -> f64 {
    (model - break_even) * 100.0
}

fn fair_line_for(p: f64) -> Option<i64> {
    (p > 0.0 && p < 1.0).then(|| fair_line(p))
}

fn format_points(x: f64) -> String {
    if x > 0.0 {
        format!("+{}", x)
    } else if x < 0.0 {
        format!("{}", x)
    } else {
        "PK".to_string()
    }
}

/// Evaluate every supplied market and choose the recommended play
pub fn compute_edges(
    result: &SimulationResult,
    market: Option<&MarketLine>,
    home_team: &str,
    away_team: &str,
    default_break_even: f64,
) -> EdgeReport {
    let home_prob = result.win_probability();
    let away_prob = result.away_win_probability();
    let market = market.filter(|m| !m.is_empty());
    let mut candidates = Vec::new();

    let moneyline = market
        .filter(|m| m.home_moneyline.is_some() || m.away_moneyline.is_some())
        .map(|m| {
            let home_implied = m.home_moneyline.map(implied_probability);
            let away_implied = m.away_moneyline.map(implied_probability);
            let edge = MoneylineEdge {
                home_win_prob: home_prob,
                away_win_prob: away_prob,
                home_implied_prob: home_implied,
                away_implied_prob: away_implied,
                home_edge: home_implied.map(|be| edge_pct(home_prob, be)),
                away_edge: away_implied.map(|be| edge_pct(away_prob, be)),
                home_fair_line: fair_line_for(home_prob),
                away_fair_line: fair_line_for(away_prob),
            };
            for (price, implied, prob, side, team) in [
                (m.home_moneyline, home_implied, home_prob, Side::Home, home_team),
                (m.away_moneyline, away_implied, away_prob, Side::Away, away_team),
            ] {
                if let (Some(price), Some(be)) = (price, implied) {
                    candidates.push(EdgeCandidate {
                        market: MarketKind::Moneyline,
                        side,
                        edge: edge_pct(prob, be),
                        model_prob: prob,
                        break_even: be,
                        price,
                        description: format!("Moneyline: {}", team),
                    });
                }
            }
            edge
        });

    let spread = match (market.and_then(|m| m.spread), result.spread) {
        (Some(line), Some(counts)) => {
            let m = market.cloned().unwrap_or_default();
            let home_be = break_even(m.home_spread_price, default_break_even);
            let away_be = break_even(m.away_spread_price, default_break_even);
            let edge = SpreadEdge {
                line,
                home_cover_prob: counts.home_cover_probability(),
                away_cover_prob: counts.away_cover_probability(),
                push_prob: counts.push_probability(),
                home_break_even: home_be,
                away_break_even: away_be,
                home_edge: edge_pct(counts.home_cover_probability(), home_be),
                away_edge: edge_pct(counts.away_cover_probability(), away_be),
            };
            candidates.push(EdgeCandidate {
                market: MarketKind::Spread,
                side: Side::Home,
                edge: edge.home_edge,
                model_prob: edge.home_cover_prob,
                break_even: home_be,
                price: m.home_spread_price.unwrap_or(STANDARD_PRICE),
                description: format!("Spread: {} {}", home_team, format_points(line)),
            });
            candidates.push(EdgeCandidate {
                market: MarketKind::Spread,
                side: Side::Away,
                edge: edge.away_edge,
                model_prob: edge.away_cover_prob,
                break_even: away_be,
                price: m.away_spread_price.unwrap_or(STANDARD_PRICE),
                description: format!("Spread: {} {}", away_team, format_points(-line)),
            });
            Some(edge)
        }
        _ => None,
    };

    let total = match (market.and_then(|m| m.total), result.total) {
        (Some(line), Some(counts)) => {
            let m = market.cloned().unwrap_or_default();
            let over_be = break_even(m.over_price, default_break_even);
            let under_be = break_even(m.under_price, default_break_even);
            let edge = TotalEdge {
                line,
                over_prob: counts.over_probability(),
                under_prob: counts.under_probability(),
                push_prob: counts.push_probability(),
                over_break_even: over_be,
                under_break_even: under_be,
                over_edge: edge_pct(counts.over_probability(), over_be),
                under_edge: edge_pct(counts.under_probability(), under_be),
            };
            candidates.push(EdgeCandidate {
                market: MarketKind::Total,
                side: Side::Over,
                edge: edge.over_edge,
                model_prob: edge.over_prob,
                break_even: over_be,
                price: m.over_price.unwrap_or(STANDARD_PRICE),
                description: format!("Total: Over {}", line),
            });
            candidates.push(EdgeCandidate {
                market: MarketKind::Total,
                side: Side::Under,
                edge: edge.under_edge,
                model_prob: edge.under_prob,
                break_even: under_be,
                price: m.under_price.unwrap_or(STANDARD_PRICE),
                description: format!("Total: Under {}", line),
            });
            Some(edge)
        }
        _ => None,
    };

    let (team, side, favored_prob) = if home_prob >= away_prob {
        (home_team, Side::Home, home_prob)
    } else {
        (away_team, Side::Away, away_prob)
    };

    let recommended = match best_candidate(&candidates) {
        Some(best) => RecommendedPlay::Market(best.clone()),
        None => RecommendedPlay::Lean {
            team: team.to_string(),
            side,
            win_probability: favored_prob,
            tier: LeanTier::from_probability(favored_prob),
            no_market_edge: market.is_some(),
        },
    };

    EdgeReport {
        moneyline,
        spread,
        total,
        candidates,
        recommended,
        baseline_edge: market
            .is_none()
            .then(|| edge_pct(favored_prob, default_break_even)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::odds::STANDARD_BREAK_EVEN;
    use crate::core::simulator::{CoverCounts, TotalCounts};
    use assert_approx_eq::assert_approx_eq;

    fn result(home_wins: u64, away_wins: u64, trials: u64) -> SimulationResult {
        SimulationResult {
            trials,
            home_wins,
            away_wins,
            ties: trials - home_wins - away_wins,
            home_points: 110 * trials,
            away_points: 105 * trials,
            highest_score: 150,
            spread: None,
            total: None,
        }
    }

    fn candidate(edge: f64, description: &str) -> EdgeCandidate {
        EdgeCandidate {
            market: MarketKind::Moneyline,
            side: Side::Home,
            edge,
            model_prob: 0.5,
            break_even: 0.5,
            price: -110.0,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_best_candidate_first_seen_wins_ties() {
        let list = vec![candidate(1.0, "a"), candidate(3.0, "b"), candidate(3.0, "c")];
        assert_eq!(best_candidate(&list).unwrap().description, "b");
    }

    #[test]
    fn test_best_candidate_ignores_non_positive() {
        let list = vec![candidate(0.0, "a"), candidate(-2.0, "b")];
        assert!(best_candidate(&list).is_none());
        assert!(best_candidate(&[]).is_none());
    }

    #[test]
    fn test_no_market_reports_lean() {
        let r = result(6_800, 3_200, 10_000);
        let report = compute_edges(&r, None, "Lakers", "Celtics", STANDARD_BREAK_EVEN);
        assert!(report.moneyline.is_none());
        match &report.recommended {
            RecommendedPlay::Lean {
                team,
                tier,
                no_market_edge,
                ..
            } => {
                assert_eq!(team, "Lakers");
                assert_eq!(*tier, LeanTier::Strong);
                assert!(!no_market_edge);
            }
            other => panic!("expected lean, got {:?}", other),
        }
        assert!(report.recommended.text().starts_with("Strong lean: Lakers"));
        assert_approx_eq!(report.baseline_edge.unwrap(), 15.6);
        assert!(report.edge_text().contains("vs -110 break-even on Lakers"));
    }

    #[test]
    fn test_lean_favors_away_side() {
        let r = result(4_800, 5_100, 10_000);
        let report = compute_edges(&r, None, "Lakers", "Celtics", STANDARD_BREAK_EVEN);
        let text = report.recommended.text();
        assert!(text.starts_with("Slight lean: Celtics"));
        assert!(text.contains("lean"));
        assert_eq!(report.edge_text(), "No strong edge vs -110 baseline");
    }

    #[test]
    fn test_lean_tiers() {
        assert_eq!(LeanTier::from_probability(0.54), LeanTier::Slight);
        assert_eq!(LeanTier::from_probability(0.55), LeanTier::Lean);
        assert_eq!(LeanTier::from_probability(0.65), LeanTier::Lean);
        assert_eq!(LeanTier::from_probability(0.66), LeanTier::Strong);
    }

    #[test]
    fn test_moneyline_edge_selected() {
        let r = result(6_500, 3_500, 10_000);
        let market = MarketLine {
            home_moneyline: Some(-150.0),
            away_moneyline: Some(130.0),
            ..Default::default()
        };
        let report = compute_edges(&r, Some(&market), "Lakers", "Celtics", STANDARD_BREAK_EVEN);
        let ml = report.moneyline.as_ref().unwrap();
        assert_approx_eq!(ml.home_edge.unwrap(), 5.0);
        assert_eq!(ml.home_fair_line, Some(-186));
        match &report.recommended {
            RecommendedPlay::Market(c) => {
                assert_eq!(c.market, MarketKind::Moneyline);
                assert_eq!(c.side, Side::Home);
            }
            other => panic!("expected market play, got {:?}", other),
        }
        assert!(report.recommended.text().starts_with("Moneyline: Lakers at -150"));
        assert!(report.edge_text().starts_with("+5.00% edge"));
    }

    #[test]
    fn test_market_without_edge_keeps_lean_with_qualifier() {
        let r = result(5_000, 5_000, 10_000);
        let market = MarketLine {
            home_moneyline: Some(-200.0),
            away_moneyline: Some(-200.0),
            ..Default::default()
        };
        let report = compute_edges(&r, Some(&market), "Lakers", "Celtics", STANDARD_BREAK_EVEN);
        assert!(report.baseline_edge.is_none());
        assert!(report.recommended.text().ends_with("no strong market edge"));
        assert_eq!(report.edge_text(), "No strong market edge");
    }

    #[test]
    fn test_spread_and_total_edges() {
        let mut r = result(6_000, 4_000, 10_000);
        r.spread = Some(CoverCounts {
            home_covers: 5_600,
            away_covers: 4_300,
            pushes: 100,
        });
        r.total = Some(TotalCounts {
            overs: 4_000,
            unders: 6_000,
            pushes: 0,
        });
        let market = MarketLine {
            spread: Some(-3.0),
            total: Some(221.5),
            under_price: Some(-105.0),
            ..Default::default()
        };
        let report = compute_edges(&r, Some(&market), "Lakers", "Celtics", STANDARD_BREAK_EVEN);

        let spread = report.spread.as_ref().unwrap();
        assert_approx_eq!(spread.home_cover_prob, 0.56);
        assert_approx_eq!(spread.push_prob, 0.01);
        assert!(spread.home_cover_prob + spread.away_cover_prob <= 1.0);
        assert_approx_eq!(spread.home_edge, 3.6);

        let total = report.total.as_ref().unwrap();
        assert_approx_eq!(total.under_break_even, 105.0 / 205.0);

        // under: 60% vs 51.2% beats spread home 56% vs 52.4%
        match &report.recommended {
            RecommendedPlay::Market(c) => {
                assert_eq!(c.market, MarketKind::Total);
                assert_eq!(c.side, Side::Under);
                assert_eq!(c.description, "Total: Under 221.5");
            }
            other => panic!("expected market play, got {:?}", other),
        }
        assert_eq!(report.candidates.len(), 4);
        assert_eq!(report.candidates[1].description, "Spread: Celtics +3");
    }

    #[test]
    fn test_pick_em_spread_formatting() {
        assert_eq!(format_points(0.0), "PK");
        assert_eq!(format_points(-0.0), "PK");
        assert_eq!(format_points(2.5), "+2.5");
    }
}
