//! Current-weather models for the enrichment panel

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current conditions for a city, in the same units as the form inputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub fetched_at: DateTime<Utc>,
    pub temperature_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub wind_speed_mps: Decimal,
    /// Visibility in decameters
    pub visibility_10m: Decimal,
    /// Estimated from temperature and humidity, not measured
    pub dew_point_celsius: Decimal,
    /// Not provided by the current-weather feed
    pub solar_radiation_mj_m2: Option<Decimal>,
    /// Last hour
    pub rainfall_mm: Decimal,
    /// Last hour
    pub snowfall_cm: Decimal,
    pub description: String,
}

impl WeatherSnapshot {
    /// Label/value rows for the sidebar, labelled in Spanish like the form
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Temperatura (°C)", self.temperature_celsius.normalize().to_string()),
            ("Humedad (%)", self.humidity_percent.normalize().to_string()),
            ("Velocidad del viento (m/s)", self.wind_speed_mps.normalize().to_string()),
            ("Visibilidad (10m)", self.visibility_10m.normalize().to_string()),
            ("Temperatura de rocío (°C)", self.dew_point_celsius.normalize().to_string()),
            (
                "Radiación solar (MJ/m2)",
                self.solar_radiation_mj_m2
                    .map(|v| v.normalize().to_string())
                    .unwrap_or_else(|| "no disponible".to_string()),
            ),
            ("Precipitación (mm)", self.rainfall_mm.normalize().to_string()),
            ("Nieve (cm)", self.snowfall_cm.normalize().to_string()),
            ("Descripción", self.description.clone()),
        ]
    }
}

/// State of the sidebar weather panel for one page render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherPanel {
    Available { snapshot: WeatherSnapshot },
    Unavailable,
}

impl WeatherPanel {
    pub fn is_available(&self) -> bool {
        matches!(self, WeatherPanel::Available { .. })
    }
}

impl From<Option<WeatherSnapshot>> for WeatherPanel {
    fn from(snapshot: Option<WeatherSnapshot>) -> Self {
        match snapshot {
            Some(snapshot) => WeatherPanel::Available { snapshot },
            None => WeatherPanel::Unavailable,
        }
    }
}

/// Coarse dew point: `temp - (100 - humidity) / 5`
///
/// Only reasonable above roughly 50% relative humidity.
pub fn approximate_dew_point(temperature_celsius: Decimal, humidity_percent: Decimal) -> Decimal {
    temperature_celsius - (Decimal::ONE_HUNDRED - humidity_percent) / Decimal::from(5)
}

/// Uppercase the first character and lowercase the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
