//! Route definitions for the bike demand predictor API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/features", get(handlers::list_features))
        .nest("/weather", weather_routes())
}

/// Weather panel routes
fn weather_routes() -> Router<AppState> {
    Router::new().route("/current", get(handlers::current_weather))
}
