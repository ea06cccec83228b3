pub mod health;
pub mod predict;
pub mod team;

use actix_web::web;
use edgeline::error::json_error_handler;

/// Register every route and the shared JSON body settings
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health::health_check))
        .route("/predict", web::post().to(predict::predict_matchup))
        .route("/predict/slate", web::post().to(predict::predict_slate))
        .route("/team-stats", web::get().to(team::team_stats));
}
