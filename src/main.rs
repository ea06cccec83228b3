use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod handlers;

use edgeline::config::ServerConfig;
use edgeline::data::StatsDirectory;
use edgeline::predictor::MatchupPredictor;

/// Application state shared across handlers
pub struct AppState {
    pub predictor: MatchupPredictor,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig, stats: StatsDirectory) -> Self {
        Self {
            predictor: MatchupPredictor::new(stats).with_seed(config.seed),
            config,
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let addr = config.bind_addr();

    info!("Loading team statistics from {:?}", config.data_dir);
    let stats = StatsDirectory::load(&config.data_dir);
    info!(
        "Statistics loaded for {} leagues, {} trials per matchup",
        stats.leagues().len(),
        config.simulations
    );

    let app_state = Arc::new(AppState::new(config, stats));

    info!("Starting Edgeline API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?
    .run()
    .await
    .context("server terminated with an error")
}
