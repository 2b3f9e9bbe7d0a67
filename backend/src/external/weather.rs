//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint. Any failure is
//! logged and reported as absence; nothing here is allowed to fail a request.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{approximate_dew_point, capitalize, WeatherSnapshot};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    visibility: Option<f64>,
    wind: OWMWind,
    rain: Option<OWMPrecipitation>,
    snow: Option<OWMPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient with a per-request timeout
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from configuration; `None` when no API key is set
    pub fn from_config(config: &WeatherConfig) -> AppResult<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }
        Self::new(
            config.api_key.clone(),
            config.api_endpoint.clone(),
            config.timeout(),
        )
        .map(Some)
    }

    /// Fetch current conditions for a city; `None` on any failure
    pub async fn fetch_current(&self, city: &str) -> Option<WeatherSnapshot> {
        match self.try_fetch_current(city).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(city, "Weather unavailable: {}", e);
                None
            }
        }
    }

    async fn try_fetch_current(&self, city: &str) -> AppResult<WeatherSnapshot> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Weather API error: {}",
                response.status()
            )));
        }

        let data: OWMCurrentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse weather response: {}", e)))?;

        convert_current_response(city, data)
    }
}

fn decimal(value: f64) -> AppResult<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| AppError::Internal(format!("Weather value out of range: {}", value)))
}

/// Convert an OpenWeatherMap response to the units used by the form
fn convert_current_response(city: &str, data: OWMCurrentResponse) -> AppResult<WeatherSnapshot> {
    let description = data
        .weather
        .first()
        .map(|w| capitalize(&w.description))
        .ok_or_else(|| AppError::Internal("Weather response has no conditions".to_string()))?;

    let temperature = decimal(data.main.temp)?;
    let humidity = decimal(data.main.humidity)?;
    let rain_mm = data.rain.and_then(|r| r.one_hour).unwrap_or(0.0);
    // Feed reports millimetres; the form takes centimetres
    let snow_cm = data.snow.and_then(|s| s.one_hour).unwrap_or(0.0) * 10.0;

    Ok(WeatherSnapshot {
        city: city.to_string(),
        fetched_at: Utc::now(),
        temperature_celsius: temperature,
        humidity_percent: humidity,
        wind_speed_mps: decimal(data.wind.speed)?,
        // Metres to decameters
        visibility_10m: decimal(data.visibility.unwrap_or(0.0) / 10.0)?,
        dew_point_celsius: approximate_dew_point(temperature, humidity),
        solar_radiation_mj_m2: None,
        rainfall_mm: decimal(rain_mm)?,
        snowfall_cm: decimal(snow_cm)?,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn seoul_body() -> serde_json::Value {
        json!({
            "coord": { "lon": 126.9778, "lat": 37.5683 },
            "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
            "main": { "temp": 18.5, "feels_like": 18.2, "pressure": 1012, "humidity": 80 },
            "visibility": 8000,
            "wind": { "speed": 3.6, "deg": 250 },
            "rain": { "1h": 0.42 },
            "snow": { "1h": 0.1 },
            "dt": 1700000000,
            "name": "Seoul"
        })
    }

    fn client(server: &MockServer) -> WeatherClient {
        WeatherClient::new("test-key".to_string(), server.uri(), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_current_converts_units() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Seoul"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(seoul_body()))
            .mount(&server)
            .await;

        let snapshot = client(&server).fetch_current("Seoul").await.unwrap();

        assert_eq!(snapshot.city, "Seoul");
        assert_eq!(snapshot.temperature_celsius, dec("18.5"));
        assert_eq!(snapshot.humidity_percent, dec("80"));
        assert_eq!(snapshot.wind_speed_mps, dec("3.6"));
        assert_eq!(snapshot.visibility_10m, dec("800"));
        assert_eq!(snapshot.dew_point_celsius, dec("14.5"));
        assert_eq!(snapshot.solar_radiation_mj_m2, None);
        assert_eq!(snapshot.rainfall_mm, dec("0.42"));
        assert_eq!(snapshot.snowfall_cm, dec("1"));
        assert_eq!(snapshot.description, "Light rain");
    }

    #[tokio::test]
    async fn test_missing_precipitation_defaults_to_zero() {
        let server = MockServer::start().await;
        let mut body = seoul_body();
        body.as_object_mut().unwrap().remove("rain");
        body.as_object_mut().unwrap().remove("snow");
        body.as_object_mut().unwrap().remove("visibility");
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let snapshot = client(&server).fetch_current("Seoul").await.unwrap();
        assert_eq!(snapshot.rainfall_mm, Decimal::ZERO);
        assert_eq!(snapshot.snowfall_cm, Decimal::ZERO);
        assert_eq!(snapshot.visibility_10m, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_not_found_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;

        assert!(client(&server).fetch_current("Atlantis").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        assert!(client(&server).fetch_current("Seoul").await.is_none());
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(seoul_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client =
            WeatherClient::new("test-key".to_string(), server.uri(), Duration::from_millis(200))
                .unwrap();
        assert!(client.fetch_current("Seoul").await.is_none());
    }

    #[test]
    fn test_unconfigured_key_disables_client() {
        let config = WeatherConfig {
            api_endpoint: "https://api.openweathermap.org/data/2.5".to_string(),
            api_key: String::new(),
            city: "Seoul".to_string(),
            timeout_secs: 5,
        };
        assert!(WeatherClient::from_config(&config).unwrap().is_none());
    }
}
