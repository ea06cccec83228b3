//! Edgeline CLI - Command-line interface for matchup projections

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use edgeline::core::edges::{MoneylineEdge, SpreadEdge, TotalEdge};
use edgeline::core::odds::format_american;
use edgeline::core::{League, MarketLine};
use edgeline::data::{StatsDirectory, TeamStatsSource};
use edgeline::models::{PredictResponse, SlateGame, SlateRequest};
use edgeline::predictor::{rank_slate, Matchup, MatchupPredictor, MAX_SLATE_GAMES};

/// Default statistics directory (relative to the working directory)
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "edgeline")]
#[command(author, version, about = "Monte Carlo matchup projection CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding <league>.json statistics files
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Fixed RNG seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Project a single matchup
    Predict {
        /// League code (NBA, NFL, NHL, MLB, NCAAB, NCAAF)
        #[arg(short, long, default_value = "NBA")]
        league: String,

        /// Home team
        #[arg(long)]
        home: String,

        /// Away team
        #[arg(long)]
        away: String,

        /// Home spread (e.g. -3.5 when the home side gives points)
        #[arg(long, allow_hyphen_values = true)]
        spread: Option<f64>,

        /// Game total
        #[arg(long)]
        total: Option<f64>,

        /// Home moneyline (American odds)
        #[arg(long, allow_hyphen_values = true)]
        home_ml: Option<f64>,

        /// Away moneyline (American odds)
        #[arg(long, allow_hyphen_values = true)]
        away_ml: Option<f64>,

        /// Number of simulated games
        #[arg(long, default_value = "500000")]
        sims: u64,

        /// Played at a neutral site
        #[arg(long)]
        neutral: bool,

        /// Bankroll for Kelly stake sizing
        #[arg(long)]
        bankroll: Option<f64>,
    },

    /// Sweep a slate of games and rank them by edge
    Slate {
        /// JSON file with {"games": [...]} or a bare array of games
        #[arg(short, long)]
        file: PathBuf,

        /// Simulated games per matchup
        #[arg(long, default_value = "5000")]
        sims: u64,

        /// Number of games to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Show a team's statistics
    Team {
        #[arg(short, long)]
        league: String,

        /// Team name; partial names match
        #[arg(short, long)]
        team: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!(
        "{}",
        format!("Edgeline CLI v{}", env!("CARGO_PKG_VERSION"))
            .cyan()
            .bold()
    );
    println!();

    let Some(command) = cli.command else {
        println!("Use --help for usage information.");
        return Ok(());
    };

    let stats = StatsDirectory::load(&cli.data_dir);
    let predictor = MatchupPredictor::new(stats).with_seed(cli.seed);

    match command {
        Commands::Predict {
            league,
            home,
            away,
            spread,
            total,
            home_ml,
            away_ml,
            sims,
            neutral,
            bankroll,
        } => {
            let market = MarketLine {
                home_moneyline: home_ml,
                away_moneyline: away_ml,
                spread,
                total,
                ..Default::default()
            };
            predict_matchup(
                &predictor,
                &league,
                &home,
                &away,
                market,
                sims,
                neutral,
                bankroll,
            )?;
        }
        Commands::Slate { file, sims, limit } => {
            run_slate(&predictor, &file, sims, limit)?;
        }
        Commands::Team { league, team } => {
            show_team(&predictor, &cli.data_dir, &league, &team)?;
        }
    }

    Ok(())
}

fn validate_predict_args(
    home: &str,
    away: &str,
    market: &MarketLine,
    sims: u64,
    bankroll: Option<f64>,
) -> Result<()> {
    if home.trim().is_empty() || away.trim().is_empty() {
        bail!("--home and --away must not be blank");
    }
    if sims == 0 {
        bail!("--sims must be at least 1");
    }
    let bad = market.invalid_prices();
    if !bad.is_empty() {
        bail!("invalid American odds for {}", bad.join(", "));
    }
    let bad = market.invalid_points();
    if !bad.is_empty() {
        bail!("invalid market line for {}", bad.join(", "));
    }
    if let Some(b) = bankroll {
        if !b.is_finite() || b <= 0.0 {
            bail!("--bankroll must be a positive amount");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn predict_matchup(
    predictor: &MatchupPredictor,
    league: &str,
    home: &str,
    away: &str,
    market: MarketLine,
    sims: u64,
    neutral: bool,
    bankroll: Option<f64>,
) -> Result<()> {
    validate_predict_args(home, away, &market, sims, bankroll)?;

    let league = League::parse_or_default(league);
    let mut matchup = Matchup::new(league, home.trim(), away.trim(), sims)
        .with_market((!market.is_empty()).then_some(market))
        .with_bankroll(bankroll);
    matchup.options.neutral_site = neutral;

    println!(
        "{}: {} {} ({} simulations{})",
        "Projecting".green(),
        league,
        format!("{} @ {}", matchup.away_team, matchup.home_team).bold(),
        sims,
        if neutral { ", neutral site" } else { "" }
    );
    println!();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Simulating...");
    let response = predictor.predict(&matchup);
    pb.finish_and_clear();

    print_projection(&response);
    print_edges(&response);
    Ok(())
}

fn print_projection(r: &PredictResponse) {
    println!("{}", "Projection:".yellow().bold());
    println!("{:<28} {:>8}", "Team", "Score");
    println!("{}", "-".repeat(37));
    println!("{:<28} {:>8}", truncate_name(&r.home_team, 28), r.projected_home_score);
    println!("{:<28} {:>8}", truncate_name(&r.away_team, 28), r.projected_away_score);
    println!();
    println!("  Home win probability: {}", r.win_probability.bold());
    println!("  Model spread:         {:+}", r.model_spread);
    println!("  Data source:          {:?}", r.data_source);
    println!();
}

fn print_moneyline(edge: &MoneylineEdge, r: &PredictResponse) {
    println!("{}", "Moneyline:".yellow().bold());
    println!("{:<28} {:>8} {:>10} {:>9} {:>8}", "Side", "Model", "Implied", "Edge", "Fair");
    println!("{}", "-".repeat(67));
    for (team, model, implied, e, fair) in [
        (&r.home_team, edge.home_win_prob, edge.home_implied_prob, edge.home_edge, edge.home_fair_line),
        (&r.away_team, edge.away_win_prob, edge.away_implied_prob, edge.away_edge, edge.away_fair_line),
    ] {
        println!(
            "{:<28} {:>7.1}% {:>10} {} {:>8}",
            truncate_name(team, 28),
            model * 100.0,
            implied.map_or("-".to_string(), |p| format!("{:.1}%", p * 100.0)),
            e.map_or(format!("{:>9}", "-"), format_edge),
            fair.map_or("-".to_string(), |f| format_american(f as f64)),
        );
    }
    println!();
}

fn print_spread(edge: &SpreadEdge, r: &PredictResponse) {
    println!("{} {:+}", "Spread:".yellow().bold(), edge.line);
    println!("{:<28} {:>8} {:>10} {:>9}", "Side", "Cover", "Break-even", "Edge");
    println!("{}", "-".repeat(58));
    for (team, prob, be, e) in [
        (&r.home_team, edge.home_cover_prob, edge.home_break_even, edge.home_edge),
        (&r.away_team, edge.away_cover_prob, edge.away_break_even, edge.away_edge),
    ] {
        println!(
            "{:<28} {:>7.1}% {:>9.1}% {}",
            truncate_name(team, 28),
            prob * 100.0,
            be * 100.0,
            format_edge(e)
        );
    }
    println!("{}", format!("push {:.1}%", edge.push_prob * 100.0).dimmed());
    println!();
}

fn print_total(edge: &TotalEdge) {
    println!("{} {}", "Total:".yellow().bold(), edge.line);
    println!("{:<28} {:>8} {:>10} {:>9}", "Side", "Model", "Break-even", "Edge");
    println!("{}", "-".repeat(58));
    for (side, prob, be, e) in [
        ("Over", edge.over_prob, edge.over_break_even, edge.over_edge),
        ("Under", edge.under_prob, edge.under_break_even, edge.under_edge),
    ] {
        println!(
            "{:<28} {:>7.1}% {:>9.1}% {}",
            side,
            prob * 100.0,
            be * 100.0,
            format_edge(e)
        );
    }
    println!("{}", format!("push {:.1}%", edge.push_prob * 100.0).dimmed());
    println!();
}

fn print_edges(r: &PredictResponse) {
    if let Some(ref ml) = r.edges.moneyline {
        print_moneyline(ml, r);
    }
    if let Some(ref spread) = r.edges.spread {
        print_spread(spread, r);
    }
    if let Some(ref total) = r.edges.total {
        print_total(total);
    }

    println!("{}", "Recommendation:".yellow().bold());
    println!("  {}", r.recommended_bet.green().bold());
    println!("  {}", r.edge.dimmed());
    if let Some(ref sizing) = r.sizing {
        print!(
            "  Kelly: {:.2}% of bankroll (full Kelly {:.2}%)",
            sizing.recommended_fraction * 100.0,
            sizing.kelly_fraction * 100.0
        );
        match sizing.stake {
            Some(stake) => println!(", stake {:.0}", stake),
            None => println!(),
        }
    }
    println!();
    println!("{}", r.explanation.dimmed());
}

fn load_slate(path: &Path) -> Result<Vec<SlateGame>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read slate from {:?}", path))?;

    if let Ok(req) = serde_json::from_str::<SlateRequest>(&text) {
        if !req.games.is_empty() {
            return Ok(req.games);
        }
    }
    serde_json::from_str::<Vec<SlateGame>>(&text)
        .with_context(|| format!("Failed to parse slate in {:?}", path))
}

fn run_slate(predictor: &MatchupPredictor, file: &Path, sims: u64, limit: usize) -> Result<()> {
    if sims == 0 {
        bail!("--sims must be at least 1");
    }
    let games = load_slate(file)?;
    if games.len() > MAX_SLATE_GAMES {
        println!(
            "{}",
            format!(
                "Slate has {} games; only the first {} are evaluated.",
                games.len(),
                MAX_SLATE_GAMES
            )
            .dimmed()
        );
    }

    let games: Vec<&SlateGame> = games.iter().take(MAX_SLATE_GAMES).collect();
    let pb = ProgressBar::new(games.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut entries = Vec::with_capacity(games.len());
    for game in games {
        pb.set_message(format!("{} @ {}", game.away_team, game.home_team));
        if let Some(entry) = predictor.slate_entry(game, sims) {
            entries.push(entry);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let entries = rank_slate(entries, limit);
    if entries.is_empty() {
        println!("{}", "No games to evaluate.".red());
        return Ok(());
    }

    println!("{}", "Top edges:".yellow().bold());
    println!(
        "{:<6} {:<36} {:>9} {:>8} {:>9}",
        "League", "Matchup", "Score", "Home %", "Edge"
    );
    println!("{}", "-".repeat(72));
    for e in &entries {
        println!(
            "{:<6} {:<36} {:>9} {:>8} {}",
            e.league.code(),
            truncate_name(&format!("{} @ {}", e.away_team, e.home_team), 36),
            format!("{}-{}", e.projected_home_score, e.projected_away_score),
            e.home_win_probability,
            format_edge(e.edge_pct)
        );
        println!("       {}", e.recommended_bet.dimmed());
    }
    Ok(())
}

fn show_team(predictor: &MatchupPredictor, data_dir: &Path, league: &str, team: &str) -> Result<()> {
    let Some(league) = League::from_code(league) else {
        bail!("Unknown league {:?}", league);
    };
    if predictor.stats().league_table(league).is_none() {
        bail!(
            "No statistics for {} in {:?} (expected {}.json)",
            league,
            data_dir,
            league.code().to_lowercase()
        );
    }

    let Some(found) = predictor.find_team(league, team) else {
        println!("{}", format!("No {} team matches {:?}.", league, team).red());
        return Ok(());
    };

    let s = &found.stats;
    println!("{} {}", found.team.yellow().bold(), format!("({})", league).dimmed());
    println!("{}", "-".repeat(30));
    for (label, value) in [
        ("Offensive rating", s.off_rating),
        ("Defensive rating", s.def_rating),
        ("Pace", s.pace),
        ("Points per game", s.ppg),
        ("Opponent ppg", s.opp_ppg),
        ("Home ppg", s.home_ppg),
        ("Away ppg", s.away_ppg),
        ("Recent ppg", s.recent_ppg),
    ] {
        let shown = value.map_or("-".to_string(), |v| format!("{:.1}", v));
        println!("{:<18} {:>10}", label, shown);
    }
    if s.ratings().is_none() {
        println!();
        println!(
            "{}",
            "Ratings incomplete; projections for this team use pseudo-ratings.".dimmed()
        );
    }
    Ok(())
}

/// Right-aligned to the Edge column, padded before colouring
fn format_edge(edge: f64) -> String {
    let text = format!("{:>9}", format!("{:+.2}%", edge));
    if edge > 0.0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Truncate a name for display
fn truncate_name(name: &str, max_len: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_len {
        name.to_string()
    } else {
        chars[..max_len - 1].iter().collect::<String>() + "…"
    }
}
