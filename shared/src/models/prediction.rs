//! Prediction result returned to the form

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one successful inference call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub prediction_id: Uuid,
    /// Model output, unaltered
    pub raw_estimate: f64,
    /// Model output floored at zero, used for display
    pub estimated_rentals: f64,
    pub message_en: String,
    pub message_es: String,
}

impl PredictionResult {
    pub fn new(prediction_id: Uuid, raw_estimate: f64) -> Self {
        let estimated_rentals = raw_estimate.max(0.0);
        Self {
            prediction_id,
            raw_estimate,
            estimated_rentals,
            message_en: format!("Estimated number of rented bikes: {:.2}", estimated_rentals),
            message_es: format!(
                "El número estimado de bicicletas alquiladas es: {:.2}",
                estimated_rentals
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_formatting() {
        let result = PredictionResult::new(Uuid::nil(), 1234.5678);
        assert_eq!(result.message_en, "Estimated number of rented bikes: 1234.57");
        assert_eq!(
            result.message_es,
            "El número estimado de bicicletas alquiladas es: 1234.57"
        );
    }

    #[test]
    fn test_negative_estimate_floored_for_display() {
        let result = PredictionResult::new(Uuid::nil(), -12.0);
        assert_eq!(result.raw_estimate, -12.0);
        assert_eq!(result.estimated_rentals, 0.0);
        assert!(result.message_en.ends_with("0.00"));
    }
}
