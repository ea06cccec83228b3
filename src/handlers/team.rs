use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::AppState;
use edgeline::core::League;
use edgeline::data::TeamStatsSource;
use edgeline::error::AppError;
use edgeline::models::TeamStatsQuery;

/// Look up one team's statistics with a forgiving name match
pub async fn team_stats(
    state: web::Data<Arc<AppState>>,
    query: web::Query<TeamStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let league = query.league.as_deref().map(str::trim).unwrap_or_default();
    let team = query.team.as_deref().map(str::trim).unwrap_or_default();
    if league.is_empty() || team.is_empty() {
        return Err(AppError::ValidationError(
            "league and team are required".to_string(),
        ));
    }

    let league = League::from_code(league)
        .ok_or_else(|| AppError::NotFound(format!("unknown league {}", league)))?;

    if state.predictor.stats().league_table(league).is_none() {
        return Err(AppError::NotFound(format!(
            "no statistics loaded for {}",
            league
        )));
    }

    let found = state
        .predictor
        .find_team(league, team)
        .ok_or_else(|| AppError::NotFound(format!("no {} team matches {:?}", league, team)))?;

    Ok(HttpResponse::Ok().json(found))
}
