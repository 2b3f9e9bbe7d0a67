//! HTTP handlers for the weather panel

use axum::{extract::State, Json};
use shared::WeatherPanel;

use crate::AppState;

/// Current conditions for the configured city, or `unavailable`
pub async fn current_weather(State(state): State<AppState>) -> Json<WeatherPanel> {
    Json(state.weather.current_panel().await)
}
