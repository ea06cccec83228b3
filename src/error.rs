use actix_web::{
    error::{BlockingError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use std::fmt;
use tracing::{error, warn};

use crate::core::market::MarketLine;
use crate::models::ErrorResponse;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// Requested league or team does not exist
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::NotFound(msg) => ("not_found", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: message,
            code: code.to_string(),
        })
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        error!("Simulation task failed: {}", err);
        AppError::InternalError("internal server error".to_string())
    }
}

/// Turn body deserialization failures into 400 validation errors
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    AppError::ValidationError(format!("invalid JSON body: {}", err)).into()
}

/// Validation functions
pub fn validate_teams(
    home: Option<&str>,
    away: Option<&str>,
) -> Result<(String, String), AppError> {
    let home = home.map(str::trim).filter(|s| !s.is_empty());
    let away = away.map(str::trim).filter(|s| !s.is_empty());

    match (home, away) {
        (Some(h), Some(a)) => Ok((h.to_string(), a.to_string())),
        _ => Err(AppError::ValidationError(
            "homeTeam and awayTeam are required".to_string(),
        )),
    }
}

/// Resolve the trial count of a request
pub fn validate_simulations(requested: Option<u64>, default: u64, max: u64) -> Result<u64, AppError> {
    match requested {
        None => Ok(default),
        Some(n) if (1..=max).contains(&n) => Ok(n),
        Some(n) => Err(AppError::ValidationError(format!(
            "simulations must be between 1 and {}, got {}",
            max, n
        ))),
    }
}

pub fn validate_market(market: &MarketLine) -> Result<(), AppError> {
    let prices = market.invalid_prices();
    if !prices.is_empty() {
        return Err(AppError::ValidationError(format!(
            "invalid American odds for {}",
            prices.join(", ")
        )));
    }

    let points = market.invalid_points();
    if !points.is_empty() {
        return Err(AppError::ValidationError(format!(
            "invalid market line for {}",
            points.join(", ")
        )));
    }
    Ok(())
}

pub fn validate_bankroll(bankroll: Option<f64>) -> Result<(), AppError> {
    match bankroll {
        Some(b) if !b.is_finite() || b <= 0.0 => Err(AppError::ValidationError(format!(
            "bankroll must be positive, got {}",
            b
        ))),
        _ => Ok(()),
    }
}
