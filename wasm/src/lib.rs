//! WebAssembly module for the Bike Demand Predictor
//!
//! Provides client-side computation for:
//! - Form validation with the same bounds the server enforces
//! - Feature encoding, for previewing the row sent to the model
//! - Dew point estimation from temperature and humidity

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {}

/// Outcome of checking a form submission
#[derive(Debug, Serialize)]
struct FormCheck {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn parse_input(input_json: &str) -> Result<RawInput, String> {
    serde_json::from_str(input_json).map_err(|e| format!("Invalid form JSON: {}", e))
}

fn encode_checked(input_json: &str) -> Result<Vec<f64>, String> {
    let raw = parse_input(input_json)?;
    validate_raw_input(&raw).map_err(|e| e.to_string())?;
    Ok(encode(&raw).as_slice().to_vec())
}

/// Encode a form submission into the 19 model columns
#[wasm_bindgen]
pub fn encode_features(input_json: &str) -> Result<Vec<f64>, JsValue> {
    encode_checked(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Validate a form submission; returns `{"valid":true}` or the failing field and message
#[wasm_bindgen]
pub fn validate_form(input_json: &str) -> String {
    let check = match parse_input(input_json) {
        Ok(raw) => match validate_raw_input(&raw) {
            Ok(()) => FormCheck {
                valid: true,
                field: None,
                message: None,
            },
            Err(e) => FormCheck {
                valid: false,
                field: Some(e.field()),
                message: Some(e.to_string()),
            },
        },
        Err(message) => FormCheck {
            valid: false,
            field: None,
            message: Some(message),
        },
    };
    serde_json::to_string(&check).unwrap_or_else(|_| r#"{"valid":false}"#.to_string())
}

/// Dataset column labels in model input order, as a JSON array
#[wasm_bindgen]
pub fn feature_columns_json() -> String {
    serde_json::to_string(&feature_columns()).unwrap_or_else(|_| "[]".to_string())
}

/// Largest day accepted for a month
#[wasm_bindgen]
pub fn max_day_of_month(month: u32) -> u32 {
    days_in_month(month)
}

/// Estimate the dew point the same way the weather panel does
#[wasm_bindgen]
pub fn estimate_dew_point(temperature_celsius: f64, humidity_percent: f64) -> f64 {
    let (Some(temperature), Some(humidity)) = (
        Decimal::from_f64_retain(temperature_celsius),
        Decimal::from_f64_retain(humidity_percent),
    ) else {
        return f64::NAN;
    };
    approximate_dew_point(temperature, humidity)
        .to_f64()
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(month: u32, day: u32, hour: u32) -> String {
        serde_json::json!({
            "month": month,
            "day": day,
            "hour": hour,
            "temperature": 21.0,
            "humidity": 55.0,
            "wind_speed": 1.8,
            "visibility": 1500.0,
            "dew_point_temperature": 11.0,
            "solar_radiation": 0.9,
            "rainfall": 0.0,
            "snowfall": 0.0,
            "season": "Autumn",
            "holiday": "Holiday",
            "functioning_day": "No"
        })
        .to_string()
    }

    #[test]
    fn test_encode_checked_layout() {
        let row = encode_checked(&form(10, 3, 8)).unwrap();
        assert_eq!(row.len(), 19);
        assert_eq!(row[0], 8.0);
        assert_eq!(row[9], 10.0);
        assert_eq!(row[10], 3.0);
        // Autumn, Holiday, not functioning
        assert_eq!(&row[11..], &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_encode_checked_rejects_invalid_day() {
        let err = encode_checked(&form(4, 31, 8)).unwrap_err();
        assert!(err.contains("no day 31"));
    }

    #[test]
    fn test_validate_form() {
        assert_eq!(validate_form(&form(2, 29, 0)), r#"{"valid":true}"#);

        let check: serde_json::Value = serde_json::from_str(&validate_form(&form(2, 29, 24))).unwrap();
        assert_eq!(check["valid"], false);
        assert_eq!(check["field"], "hour");

        let check: serde_json::Value = serde_json::from_str(&validate_form("{")).unwrap();
        assert_eq!(check["valid"], false);
        assert!(check.get("field").is_none());
    }

    #[test]
    fn test_feature_columns_json() {
        let columns: Vec<String> = serde_json::from_str(&feature_columns_json()).unwrap();
        assert_eq!(columns.len(), 19);
        assert_eq!(columns[1], "Temperature(°C)");
        assert_eq!(columns[18], "Functioning Day_Yes");
    }

    #[test]
    fn test_max_day_of_month() {
        assert_eq!(max_day_of_month(2), 29);
        assert_eq!(max_day_of_month(11), 30);
        assert_eq!(max_day_of_month(12), 31);
    }

    #[test]
    fn test_estimate_dew_point() {
        assert!((estimate_dew_point(25.0, 60.0) - 17.0).abs() < 1e-9);
        assert!(estimate_dew_point(f64::NAN, 60.0).is_nan());
    }
}
