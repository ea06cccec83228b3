use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use crate::AppState;
use edgeline::config::ServerConfig;
use edgeline::core::{InjuryReport, League, MatchupOptions};
use edgeline::error::{
    validate_bankroll, validate_market, validate_simulations, validate_teams, AppError,
};
use edgeline::models::{PredictRequest, SlateRequest};
use edgeline::predictor::{Matchup, DEFAULT_SLATE_LIMIT};

/// Validate a request body and turn it into a matchup
fn matchup_from_request(req: PredictRequest, config: &ServerConfig) -> Result<Matchup, AppError> {
    let (home, away) = validate_teams(req.home_team.as_deref(), req.away_team.as_deref())?;
    let simulations =
        validate_simulations(req.simulations, config.simulations, config.max_simulations)?;
    if let Some(ref market) = req.market {
        validate_market(market)?;
    }
    validate_bankroll(req.bankroll)?;

    let league = League::parse_or_default(req.league.as_deref().unwrap_or_default());
    let options = MatchupOptions {
        neutral_site: req.neutral_site,
        home_injuries: InjuryReport::from_flags(req.home_major_injury, req.home_minor_injury)
            .with_players(req.home_injuries),
        away_injuries: InjuryReport::from_flags(req.away_major_injury, req.away_minor_injury)
            .with_players(req.away_injuries),
    };

    Ok(Matchup::new(league, &home, &away, simulations)
        .with_options(options)
        .with_market(req.market)
        .with_bankroll(req.bankroll))
}

/// Project a single matchup
pub async fn predict_matchup(
    state: web::Data<Arc<AppState>>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, AppError> {
    let matchup = matchup_from_request(req.into_inner(), &state.config)?;
    debug!(
        "Simulating {} @ {} ({} trials)",
        matchup.away_team, matchup.home_team, matchup.simulations
    );

    // CPU-bound; keep it off the async workers
    let state = state.get_ref().clone();
    let response = web::block(move || state.predictor.predict(&matchup)).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Quick sweep over a list of games, largest edges first
pub async fn predict_slate(
    state: web::Data<Arc<AppState>>,
    req: web::Json<SlateRequest>,
) -> Result<HttpResponse, AppError> {
    let req = req.into_inner();
    let simulations = validate_simulations(
        req.simulations,
        state.config.slate_simulations,
        state.config.max_simulations,
    )?;
    let limit = req.limit.unwrap_or(DEFAULT_SLATE_LIMIT);

    let state = state.get_ref().clone();
    let entries =
        web::block(move || state.predictor.predict_slate(&req.games, simulations, limit)).await?;

    Ok(HttpResponse::Ok().json(entries))
}
