use crate::core::edges::{compute_edges, RecommendedPlay};
use crate::core::kelly::KellyCalculator;
use crate::core::league::{League, ModelParams};
use crate::core::market::MarketLine;
use crate::core::resolver::{resolve, MatchupOptions, MatchupProjection, RatingSource};
use crate::core::simulator::Simulator;
use crate::data::stats::{StatsDirectory, TeamStatsSource};
use crate::models::{EdgesBreakdown, PredictResponse, SlateEntry, SlateGame, TeamStatsResponse};
use tracing::{debug, info};

/// Games evaluated per slate sweep
pub const MAX_SLATE_GAMES: usize = 20;
/// Slate entries returned when no limit is given
pub const DEFAULT_SLATE_LIMIT: usize = 5;
/// Slate edges inside this band (percentage points) are informational
const SLATE_LEAN_THRESHOLD: f64 = 1.0;

/// A fully validated matchup to project
#[derive(Debug, Clone)]
pub struct Matchup {
    pub league: League,
    pub home_team: String,
    pub away_team: String,
    pub options: MatchupOptions,
    pub market: Option<MarketLine>,
    pub simulations: u64,
    pub bankroll: Option<f64>,
}

impl Matchup {
    pub fn new(league: League, home_team: &str, away_team: &str, simulations: u64) -> Self {
        Self {
            league,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            options: MatchupOptions::default(),
            market: None,
            simulations,
            bankroll: None,
        }
    }

    pub fn with_options(mut self, options: MatchupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_market(mut self, market: Option<MarketLine>) -> Self {
        self.market = market;
        self
    }

    pub fn with_bankroll(mut self, bankroll: Option<f64>) -> Self {
        self.bankroll = bankroll;
        self
    }
}

/// Runs the projection pipeline: resolve, simulate, price edges, size.
pub struct MatchupPredictor<S: TeamStatsSource = StatsDirectory> {
    stats: S,
    params: ModelParams,
    kelly: KellyCalculator,
    seed: Option<u64>,
}

impl<S: TeamStatsSource> MatchupPredictor<S> {
    pub fn new(stats: S) -> Self {
        Self {
            stats,
            params: ModelParams::default(),
            kelly: KellyCalculator::default(),
            seed: None,
        }
    }

    /// Fix the RNG seed for reproducible projections
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Expected scores and spread of the score distribution
    pub fn project(
        &self,
        league: League,
        home: &str,
        away: &str,
        options: &MatchupOptions,
    ) -> MatchupProjection {
        resolve(
            league,
            home,
            away,
            options,
            self.stats.league_table(league),
            &self.params,
        )
    }

    /// Project and simulate one matchup and price any market supplied
    pub fn predict(&self, matchup: &Matchup) -> PredictResponse {
        let home = matchup.home_team.as_str();
        let away = matchup.away_team.as_str();
        let projection = self.project(matchup.league, home, away, &matchup.options);

        let result = Simulator::new(matchup.simulations)
            .with_seed(self.seed)
            .simulate(&projection, matchup.market.as_ref());

        let report = compute_edges(
            &result,
            matchup.market.as_ref(),
            home,
            away,
            self.params.default_break_even,
        );

        let projected_home = result.projected_home();
        let projected_away = result.projected_away();
        let win_pct = result.win_probability() * 100.0;

        let sizing = match &report.recommended {
            RecommendedPlay::Market(play) => {
                Some(self.kelly.size_american(play.model_prob, play.price, matchup.bankroll))
            }
            RecommendedPlay::Lean { .. } => None,
        };

        info!(
            "{} {} @ {}: {:.2}% home, projected {}-{}",
            matchup.league, away, home, win_pct, projected_home, projected_away
        );

        PredictResponse {
            matchup: format!("{} @ {}", away, home),
            home_team: home.to_string(),
            away_team: away.to_string(),
            league: matchup.league,
            projected_home_score: projected_home,
            projected_away_score: projected_away,
            projected_score: format!("{}–{}", projected_home, projected_away),
            model_spread: i64::from(projected_home) - i64::from(projected_away),
            win_probability: format!("{:.2}%", win_pct),
            edge: report.edge_text(),
            recommended_bet: report.recommended.text(),
            explanation: explanation(
                &projection,
                home,
                away,
                matchup.simulations,
                win_pct,
                (projected_home, projected_away),
            ),
            edges: EdgesBreakdown {
                moneyline: report.moneyline,
                spread: report.spread,
                total: report.total,
            },
            simulations: result.trials,
            data_source: projection.source,
            sizing,
        }
    }

    /// Quick projection of one slate game; `None` when a team name is blank
    pub fn slate_entry(&self, game: &SlateGame, simulations: u64) -> Option<SlateEntry> {
        let home = game.home_team.trim();
        let away = game.away_team.trim();
        if home.is_empty() || away.is_empty() {
            debug!("Skipping slate game with a blank team name");
            return None;
        }

        let league = League::parse_or_default(game.league.as_deref().unwrap_or_default());
        let options = MatchupOptions {
            neutral_site: game.neutral_site,
            ..Default::default()
        };
        let projection = self.project(league, home, away, &options);
        let result = Simulator::new(simulations)
            .with_seed(self.seed)
            .simulate(&projection, None);

        let home_prob = result.win_probability();
        let edge_pct = (home_prob - self.params.default_break_even) * 100.0;

        let (recommended_bet, edge_text) = if edge_pct > SLATE_LEAN_THRESHOLD {
            (
                format!("Moneyline lean: {} (model {:.1}% win)", home, home_prob * 100.0),
                format!("Approx {:+.2}% vs generic -110 break-even", edge_pct),
            )
        } else if edge_pct < -SLATE_LEAN_THRESHOLD {
            (
                format!(
                    "Contrarian lean: {} moneyline (model {:.1}% win)",
                    away,
                    result.away_win_probability() * 100.0
                ),
                format!("Approx {:+.2}% vs generic -110 (fade home)", -edge_pct),
            )
        } else {
            (
                "No clear edge, info only.".to_string(),
                "Edge < ±1% vs generic -110 price.".to_string(),
            )
        };

        Some(SlateEntry {
            league,
            home_team: home.to_string(),
            away_team: away.to_string(),
            projected_home_score: result.projected_home(),
            projected_away_score: result.projected_away(),
            home_win_probability: format!("{:.2}%", home_prob * 100.0),
            edge_pct,
            edge_text,
            recommended_bet,
        })
    }

    /// Sweep up to twenty games and return the largest edges first
    pub fn predict_slate(
        &self,
        games: &[SlateGame],
        simulations: u64,
        limit: usize,
    ) -> Vec<SlateEntry> {
        let entries = games
            .iter()
            .take(MAX_SLATE_GAMES)
            .filter_map(|game| self.slate_entry(game, simulations))
            .collect();
        rank_slate(entries, limit)
    }

    /// Fuzzy lookup of a team's statistics
    pub fn find_team(&self, league: League, query: &str) -> Option<TeamStatsResponse> {
        let (team, stats) = self.stats.league_table(league)?.find_team(query)?;
        Some(TeamStatsResponse {
            league,
            team: team.to_string(),
            stats: stats.clone(),
        })
    }
}

/// Sort by absolute edge, largest first, and keep `limit` entries
pub fn rank_slate(mut entries: Vec<SlateEntry>, limit: usize) -> Vec<SlateEntry> {
    entries.sort_by(|a, b| b.edge_pct.abs().total_cmp(&a.edge_pct.abs()));
    entries.truncate(limit);
    entries
}

fn explanation(
    projection: &MatchupProjection,
    home: &str,
    away: &str,
    simulations: u64,
    win_pct: f64,
    (projected_home, projected_away): (u32, u32),
) -> String {
    let model = match projection.source {
        RatingSource::TeamStats => format!(
            "team offensive/defensive ratings and pace from the {} statistics table",
            projection.league
        ),
        RatingSource::PseudoRatings => "league scoring averages plus team-specific strength \
             profiles derived from their names (offense, defense, pace)"
            .to_string(),
    };

    format!(
        "{} vs {} is modeled using {}, then simulated {} times. {} wins {:.2}% of sims. \
         Projected final: {} {} – {} {}.",
        home, away, model, simulations, home, win_pct, home, projected_home, away, projected_away
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::{LeagueTable, TeamStatRecord};
    use std::collections::BTreeMap;

    const SIMS: u64 = 20_000;

    fn predictor() -> MatchupPredictor {
        MatchupPredictor::new(StatsDirectory::empty()).with_seed(Some(7))
    }

    fn record(off: f64, def: f64) -> TeamStatRecord {
        TeamStatRecord {
            off_rating: Some(off),
            def_rating: Some(def),
            pace: Some(100.0),
            ..Default::default()
        }
    }

    fn nba_table() -> StatsDirectory {
        let teams: BTreeMap<String, TeamStatRecord> = [
            ("Boston Celtics".to_string(), record(120.0, 108.0)),
            ("Los Angeles Lakers".to_string(), record(114.0, 113.0)),
        ]
        .into_iter()
        .collect();
        let table = LeagueTable {
            avg_points: None,
            std_dev_points: None,
            teams,
        };
        [(League::Nba, table)].into_iter().collect()
    }

    #[test]
    fn test_predict_without_market() {
        let response = predictor().predict(&Matchup::new(League::Nba, "Lakers", "Celtics", SIMS));

        assert_eq!(response.matchup, "Celtics @ Lakers");
        assert!(response.win_probability.ends_with('%'));
        assert!(response.recommended_bet.contains("lean"));
        assert!(response.edges.moneyline.is_none());
        assert!(response.edges.spread.is_none());
        assert!(response.sizing.is_none());
        assert_eq!(response.simulations, SIMS);
        assert_eq!(response.data_source, RatingSource::PseudoRatings);
        assert_eq!(
            response.projected_score,
            format!(
                "{}–{}",
                response.projected_home_score, response.projected_away_score
            )
        );
        assert!(response.explanation.contains("derived from their names"));
    }

    #[test]
    fn test_predict_with_spread() {
        let market = MarketLine {
            spread: Some(-3.5),
            ..Default::default()
        };
        let matchup =
            Matchup::new(League::Nba, "Lakers", "Celtics", SIMS).with_market(Some(market));
        let response = predictor().predict(&matchup);

        let spread = response.edges.spread.expect("spread edge");
        assert!(spread.home_cover_prob + spread.away_cover_prob <= 1.0);
        assert_eq!(spread.push_prob, 0.0);
    }

    #[test]
    fn test_custom_params_move_break_even() {
        let market = MarketLine {
            spread: Some(-3.5),
            ..Default::default()
        };
        let matchup =
            Matchup::new(League::Nba, "Lakers", "Celtics", SIMS).with_market(Some(market));

        let standard = predictor().predict(&matchup);
        let even_money = predictor()
            .with_params(ModelParams {
                default_break_even: 0.5,
                ..Default::default()
            })
            .predict(&matchup);

        let a = standard.edges.spread.expect("spread edge");
        let b = even_money.edges.spread.expect("spread edge");
        assert_eq!(a.home_break_even, 0.524);
        assert_eq!(b.home_break_even, 0.5);
        assert_eq!(a.home_cover_prob, b.home_cover_prob);
        assert!((b.home_edge - a.home_edge - 2.4).abs() < 1e-6);
    }

    #[test]
    fn test_market_play_is_sized() {
        // +500 on a near coin flip is always a positive edge
        let market = MarketLine {
            home_moneyline: Some(500.0),
            away_moneyline: Some(500.0),
            ..Default::default()
        };
        let matchup = Matchup::new(League::Nba, "Lakers", "Celtics", SIMS)
            .with_market(Some(market))
            .with_bankroll(Some(1_000.0));
        let response = predictor().predict(&matchup);

        assert!(response.recommended_bet.starts_with("Moneyline:"));
        let sizing = response.sizing.expect("sizing for a market play");
        assert!(sizing.recommended_fraction > 0.0);
        assert!(sizing.recommended_fraction <= 0.10);
        assert!(sizing.stake.is_some());
    }

    #[test]
    fn test_team_stats_source() {
        let predictor = MatchupPredictor::new(nba_table()).with_seed(Some(3));
        let response = predictor.predict(&Matchup::new(
            League::Nba,
            "Boston Celtics",
            "Los Angeles Lakers",
            SIMS,
        ));

        assert_eq!(response.data_source, RatingSource::TeamStats);
        assert!(response.model_spread > 0);
        assert!(response.explanation.contains("NBA statistics table"));
    }

    #[test]
    fn test_predict_is_reproducible_with_seed() {
        let matchup = Matchup::new(League::Nfl, "Chiefs", "Bills", SIMS);
        let a = predictor().predict(&matchup);
        let b = predictor().predict(&matchup);
        assert_eq!(a.win_probability, b.win_probability);
        assert_eq!(a.projected_score, b.projected_score);
    }

    fn game(league: &str, home: &str, away: &str) -> SlateGame {
        SlateGame {
            league: Some(league.to_string()),
            home_team: home.to_string(),
            away_team: away.to_string(),
            neutral_site: false,
        }
    }

    #[test]
    fn test_slate_skips_blank_teams_and_ranks() {
        let games = vec![
            game("NBA", "Lakers", "Celtics"),
            game("NFL", "", "Bills"),
            game("NHL", "Bruins", "Rangers"),
            game("MLB", "Yankees", "Red Sox"),
        ];
        let entries = predictor().predict_slate(&games, 5_000, 10);

        assert_eq!(entries.len(), 3);
        for pair in entries.windows(2) {
            assert!(pair[0].edge_pct.abs() >= pair[1].edge_pct.abs());
        }
        assert!(entries.iter().all(|e| e.home_win_probability.ends_with('%')));
    }

    #[test]
    fn test_slate_caps_games_and_limit() {
        let games: Vec<SlateGame> = (0..25)
            .map(|i| game("NBA", &format!("Home {}", i), &format!("Away {}", i)))
            .collect();
        let predictor = predictor();

        assert_eq!(predictor.predict_slate(&games, 500, 100).len(), MAX_SLATE_GAMES);
        assert_eq!(
            predictor.predict_slate(&games, 500, DEFAULT_SLATE_LIMIT).len(),
            DEFAULT_SLATE_LIMIT
        );
    }

    #[test]
    fn test_slate_lean_text() {
        let entry = predictor()
            .slate_entry(&game("NBA", "Lakers", "Celtics"), 5_000)
            .unwrap();
        if entry.edge_pct > 1.0 {
            assert!(entry.recommended_bet.starts_with("Moneyline lean: Lakers"));
        } else if entry.edge_pct < -1.0 {
            assert!(entry.recommended_bet.starts_with("Contrarian lean: Celtics"));
        } else {
            assert!(entry.recommended_bet.contains("info only"));
        }
    }

    #[test]
    fn test_rank_slate_orders_by_absolute_edge() {
        let entry = |edge: f64| SlateEntry {
            league: League::Nba,
            home_team: "H".to_string(),
            away_team: "A".to_string(),
            projected_home_score: 100,
            projected_away_score: 100,
            home_win_probability: "50.00%".to_string(),
            edge_pct: edge,
            edge_text: String::new(),
            recommended_bet: String::new(),
        };
        let ranked = rank_slate(vec![entry(0.5), entry(-7.0), entry(3.0)], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].edge_pct, -7.0);
        assert_eq!(ranked[1].edge_pct, 3.0);
    }

    #[test]
    fn test_find_team() {
        let predictor = MatchupPredictor::new(nba_table());
        let found = predictor.find_team(League::Nba, "lakers").unwrap();
        assert_eq!(found.team, "Los Angeles Lakers");
        assert_eq!(found.stats.off_rating, Some(114.0));
        assert!(predictor.find_team(League::Nba, "Knicks").is_none());
        assert!(predictor.find_team(League::Nfl, "Lakers").is_none());
    }
}
