//! Weather service feeding the sidebar panel

use shared::WeatherPanel;

use crate::config::WeatherConfig;
use crate::error::AppResult;
use crate::external::weather::WeatherClient;

/// Fetches current conditions for the configured city
#[derive(Clone)]
pub struct WeatherService {
    weather_client: Option<WeatherClient>,
    city: String,
}

impl WeatherService {
    /// Create a new WeatherService; without an API key every panel is unavailable
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let weather_client = WeatherClient::from_config(config)?;
        if weather_client.is_none() {
            tracing::warn!("No weather API key configured, weather panel disabled");
        }

        Ok(Self {
            weather_client,
            city: config.city.clone(),
        })
    }

    /// Build a service against an explicit client
    pub fn with_client(weather_client: Option<WeatherClient>, city: impl Into<String>) -> Self {
        Self {
            weather_client,
            city: city.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.weather_client.is_some()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Current panel state; never fails
    pub async fn current_panel(&self) -> WeatherPanel {
        match &self.weather_client {
            Some(client) => client.fetch_current(&self.city).await.into(),
            None => WeatherPanel::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_disabled_service_is_unavailable() {
        let service = WeatherService::with_client(None, "Seoul");
        assert!(!service.is_enabled());
        assert_eq!(service.current_panel().await, WeatherPanel::Unavailable);
    }

    #[tokio::test]
    async fn test_upstream_error_degrades_panel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client =
            WeatherClient::new("key".to_string(), server.uri(), Duration::from_secs(2)).unwrap();
        let service = WeatherService::with_client(Some(client), "Seoul");

        assert!(service.is_enabled());
        assert!(!service.current_panel().await.is_available());
    }
}
