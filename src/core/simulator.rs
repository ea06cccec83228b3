//! Monte Carlo score simulator
//!
//! Draws independent (home, away) score pairs from normal distributions
//! centered on the projected means. Trials run in fixed-size shards on the
//! rayon pool; shard tallies are plain sums and merge in any order.

use super::market::MarketLine;
use super::resolver::MatchupProjection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::f64::consts::PI;
use tracing::{debug, instrument};

/// Trials per shard
pub const SHARD_SIZE: u64 = 65_536;

/// Spread market tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverCounts {
    pub home_covers: u64,
    pub away_covers: u64,
    pub pushes: u64,
}

impl CoverCounts {
    fn merge(self, other: Self) -> Self {
        Self {
            home_covers: self.home_covers + other.home_covers,
            away_covers: self.away_covers + other.away_covers,
            pushes: self.pushes + other.pushes,
        }
    }

    fn decided(&self) -> u64 {
        self.home_covers + self.away_covers + self.pushes
    }

    /// Pushes stay in the denominator
    pub fn home_cover_probability(&self) -> f64 {
        ratio(self.home_covers, self.decided())
    }

    pub fn away_cover_probability(&self) -> f64 {
        ratio(self.away_covers, self.decided())
    }

    pub fn push_probability(&self) -> f64 {
        ratio(self.pushes, self.decided())
    }
}

/// Totals market tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalCounts {
    pub overs: u64,
    pub unders: u64,
    pub pushes: u64,
}

impl TotalCounts {
    fn merge(self, other: Self) -> Self {
        Self {
            overs: self.overs + other.overs,
            unders: self.unders + other.unders,
            pushes: self.pushes + other.pushes,
        }
    }

    fn decided(&self) -> u64 {
        self.overs + self.unders + self.pushes
    }

    pub fn over_probability(&self) -> f64 {
        ratio(self.overs, self.decided())
    }

    pub fn under_probability(&self) -> f64 {
        ratio(self.unders, self.decided())
    }

    pub fn push_probability(&self) -> f64 {
        ratio(self.pushes, self.decided())
    }
}

fn ratio(n: u64, d: u64) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

/// Aggregate of a batch of trials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationResult {
    pub trials: u64,
    pub home_wins: u64,
    pub away_wins: u64,
    pub ties: u64,
    pub home_points: u64,
    pub away_points: u64,
    /// Highest single score drawn by either side
    pub highest_score: u32,
    pub spread: Option<CoverCounts>,
    pub total: Option<TotalCounts>,
}

impl SimulationResult {
    fn empty(market: Option<&MarketLine>) -> Self {
        Self {
            spread: market
                .and_then(|m| m.spread)
                .map(|_| CoverCounts::default()),
            total: market.and_then(|m| m.total).map(|_| TotalCounts::default()),
            ..Default::default()
        }
    }

    /// Combine two partial tallies
    pub fn merge(self, other: Self) -> Self {
        Self {
            trials: self.trials + other.trials,
            home_wins: self.home_wins + other.home_wins,
            away_wins: self.away_wins + other.away_wins,
            ties: self.ties + other.ties,
            home_points: self.home_points + other.home_points,
            away_points: self.away_points + other.away_points,
            highest_score: self.highest_score.max(other.highest_score),
            spread: merge_opt(self.spread, other.spread, CoverCounts::merge),
            total: merge_opt(self.total, other.total, TotalCounts::merge),
        }
    }

    /// Share of trials the home side won outright; ties count for neither side
    pub fn win_probability(&self) -> f64 {
        ratio(self.home_wins, self.trials)
    }

    pub fn away_win_probability(&self) -> f64 {
        ratio(self.away_wins, self.trials)
    }

    pub fn projected_home(&self) -> u32 {
        mean_points(self.home_points, self.trials)
    }

    pub fn projected_away(&self) -> u32 {
        mean_points(self.away_points, self.trials)
    }
}

fn merge_opt<T>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn mean_points(sum: u64, trials: u64) -> u32 {
    if trials == 0 {
        0
    } else {
        (sum as f64 / trials as f64).round() as u32
    }
}

/// Normal variate via the Box–Muller transform
pub fn normal_sample<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> f64 {
    // (0, 1] keeps ln() finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + z * sd
}

/// One simulated score, rounded and clamped to `[0, cap]`
fn draw_score<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64, cap: u32) -> u32 {
    let raw = normal_sample(rng, mean, sd).round();
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, f64::from(cap)) as u32
}

/// Monte Carlo driver
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    pub trials: u64,
    /// Fixed seed for reproducible runs; entropy-seeded when `None`
    pub seed: Option<u64>,
}

impl Simulator {
    pub fn new(trials: u64) -> Self {
        Self { trials, seed: None }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[instrument(name = "Simulator::simulate", skip(self, projection, market), fields(trials = self.trials))]
    pub fn simulate(
        &self,
        projection: &MatchupProjection,
        market: Option<&MarketLine>,
    ) -> SimulationResult {
        let shards = self.trials.div_ceil(SHARD_SIZE);
        let trials = self.trials;
        let seed = self.seed;

        let result = (0..shards)
            .into_par_iter()
            .map(|shard| {
                let count = SHARD_SIZE.min(trials - shard * SHARD_SIZE);
                let mut rng = shard_rng(seed, shard);
                run_shard(&mut rng, projection, market, count)
            })
            .reduce(|| SimulationResult::empty(market), SimulationResult::merge);

        debug!(
            home_wins = result.home_wins,
            away_wins = result.away_wins,
            ties = result.ties,
            "simulation finished"
        );

        result
    }
}

fn shard_rng(seed: Option<u64>, shard: u64) -> StdRng {
    match seed {
        Some(seed) => {
            StdRng::seed_from_u64(seed ^ (shard + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        }
        None => StdRng::from_entropy(),
    }
}

fn run_shard<R: Rng + ?Sized>(
    rng: &mut R,
    projection: &MatchupProjection,
    market: Option<&MarketLine>,
    count: u64,
) -> SimulationResult {
    let mut result = SimulationResult::empty(market);
    let spread = market.and_then(|m| m.spread);
    let total = market.and_then(|m| m.total);
    let cap = projection.score_cap;

    for _ in 0..count {
        let home = draw_score(rng, projection.expected_home, projection.sd, cap);
        let away = draw_score(rng, projection.expected_away, projection.sd, cap);

        result.trials += 1;
        result.home_points += u64::from(home);
        result.away_points += u64::from(away);
        result.highest_score = result.highest_score.max(home).max(away);

        match home.cmp(&away) {
            std::cmp::Ordering::Greater => result.home_wins += 1,
            std::cmp::Ordering::Less => result.away_wins += 1,
            std::cmp::Ordering::Equal => result.ties += 1,
        }

        if let (Some(line), Some(counts)) = (spread, result.spread.as_mut()) {
            let margin = f64::from(home) + line - f64::from(away);
            if margin > 0.0 {
                counts.home_covers += 1;
            } else if margin < 0.0 {
                counts.away_covers += 1;
            } else {
                counts.pushes += 1;
            }
        }

        if let (Some(line), Some(counts)) = (total, result.total.as_mut()) {
            let combined = (u64::from(home) + u64::from(away)) as f64;
            if combined > line {
                counts.overs += 1;
            } else if combined < line {
                counts.unders += 1;
            } else {
                counts.pushes += 1;
            }
        }
    }

    result
}
