//! Standard scaler restored from its fitted parameters
//!
//! The artifact is a JSON object with the fitted attributes of a standard
//! scaler. Keys may be written with or without the trailing underscore:
//!
//! ```json
//! {
//!   "mean_": [11.5, 12.88, ...],
//!   "scale_": [6.92, 11.94, ...],
//!   "n_features_in_": 19,
//!   "feature_names_in_": ["Hour", "Temperature(°C)", ...]
//! }
//! ```

use serde::Deserialize;
use shared::feature_columns;

use crate::services::prediction::{FeatureScaler, InferenceError};

#[derive(Debug, Deserialize)]
struct ScalerParams {
    #[serde(default, alias = "mean_")]
    mean: Option<Vec<f64>>,
    #[serde(default, alias = "scale_")]
    scale: Option<Vec<f64>>,
    #[serde(default, alias = "n_features_in_")]
    n_features_in: Option<usize>,
    #[serde(default, alias = "feature_names_in_")]
    feature_names_in: Option<Vec<String>>,
    #[serde(default = "enabled")]
    with_mean: bool,
    #[serde(default = "enabled")]
    with_std: bool,
}

fn enabled() -> bool {
    true
}

/// Per-column `(x - mean) / scale`
#[derive(Debug, Clone)]
pub struct StandardScaler {
    n_features: usize,
    mean: Option<Vec<f64>>,
    scale: Option<Vec<f64>>,
}

impl StandardScaler {
    /// Parse fitted parameters; the error string describes what is wrong with the content
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let params: ScalerParams =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid scaler JSON: {}", e))?;

        let mean = if params.with_mean {
            Some(params.mean.ok_or("with_mean is set but mean_ is missing")?)
        } else {
            None
        };
        let scale = if params.with_std {
            let scale = params.scale.ok_or("with_std is set but scale_ is missing")?;
            // Constant columns were fit with a zero scale
            Some(scale.into_iter().map(|s| if s == 0.0 { 1.0 } else { s }).collect::<Vec<_>>())
        } else {
            None
        };

        let n_features = params
            .n_features_in
            .or_else(|| mean.as_ref().map(Vec::len))
            .or_else(|| scale.as_ref().map(Vec::len))
            .ok_or("cannot determine the number of input features")?;

        for (name, values) in [("mean_", &mean), ("scale_", &scale)] {
            if let Some(values) = values {
                if values.len() != n_features {
                    return Err(format!(
                        "{} has {} entries but the scaler expects {} features",
                        name,
                        values.len(),
                        n_features
                    ));
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(format!("{} contains non-finite values", name));
                }
            }
        }

        if let Some(names) = params.feature_names_in {
            check_column_order(&names)?;
        }

        Ok(Self {
            n_features,
            mean,
            scale,
        })
    }
}

/// Fit-time column names must be the model columns in the same order
fn check_column_order(names: &[String]) -> Result<(), String> {
    let expected = feature_columns();
    if names.len() != expected.len() {
        return Err(format!(
            "scaler was fit on {} columns, expected {}",
            names.len(),
            expected.len()
        ));
    }
    for (position, (found, wanted)) in names.iter().zip(expected.iter()).enumerate() {
        if found != wanted {
            return Err(format!(
                "column {} is '{}' in the scaler but '{}' in the feature schema",
                position, found, wanted
            ));
        }
    }
    Ok(())
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::Scaling(format!(
                "row has {} columns but the scaler was fit on {}",
                row.len(),
                self.n_features
            )));
        }

        let scaled = row
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let centered = match &self.mean {
                    Some(mean) => x - mean[i],
                    None => x,
                };
                match &self.scale {
                    Some(scale) => centered / scale[i],
                    None => centered,
                }
            })
            .collect();
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::FEATURE_COUNT;

    fn params(mean: f64, scale: f64) -> serde_json::Value {
        json!({
            "mean_": vec![mean; FEATURE_COUNT],
            "scale_": vec![scale; FEATURE_COUNT],
            "n_features_in_": FEATURE_COUNT,
        })
    }

    #[test]
    fn test_transform_centers_and_scales() {
        let scaler = StandardScaler::from_json(params(2.0, 4.0).to_string().as_bytes()).unwrap();
        let row = [10.0; FEATURE_COUNT];
        let scaled = scaler.transform(&row).unwrap();
        assert!(scaled.iter().all(|v| (*v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let scaler = StandardScaler::from_json(params(1.0, 0.0).to_string().as_bytes()).unwrap();
        let scaled = scaler.transform(&[3.0; FEATURE_COUNT]).unwrap();
        assert_eq!(scaled[0], 2.0);
    }

    #[test]
    fn test_zero_row_transforms() {
        let scaler = StandardScaler::from_json(params(0.5, 2.0).to_string().as_bytes()).unwrap();
        let scaled = scaler.transform(&[0.0; FEATURE_COUNT]).unwrap();
        assert_eq!(scaled.len(), FEATURE_COUNT);
        assert_eq!(scaled[5], -0.25);
    }

    #[test]
    fn test_dimension_mismatch_is_scaling_error() {
        let scaler = StandardScaler::from_json(params(0.0, 1.0).to_string().as_bytes()).unwrap();
        let err = scaler.transform(&[0.0; 18]).unwrap_err();
        assert!(matches!(err, InferenceError::Scaling(_)));
    }

    #[test]
    fn test_unprefixed_keys_accepted() {
        let body = json!({
            "mean": vec![0.0; FEATURE_COUNT],
            "scale": vec![1.0; FEATURE_COUNT],
        });
        let scaler = StandardScaler::from_json(body.to_string().as_bytes()).unwrap();
        assert_eq!(scaler.n_features(), FEATURE_COUNT);
    }

    #[test]
    fn test_with_mean_disabled() {
        let body = json!({
            "scale_": vec![2.0; FEATURE_COUNT],
            "with_mean": false,
        });
        let scaler = StandardScaler::from_json(body.to_string().as_bytes()).unwrap();
        assert_eq!(scaler.transform(&[4.0; FEATURE_COUNT]).unwrap()[0], 2.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let body = json!({
            "mean_": vec![0.0; FEATURE_COUNT],
            "scale_": vec![1.0; FEATURE_COUNT - 1],
        });
        let err = StandardScaler::from_json(body.to_string().as_bytes()).unwrap_err();
        assert!(err.contains("scale_"));
    }

    #[test]
    fn test_column_names_checked() {
        let mut names: Vec<String> = feature_columns().iter().map(|c| c.to_string()).collect();
        let mut body = params(0.0, 1.0);
        body["feature_names_in_"] = json!(names);
        assert!(StandardScaler::from_json(body.to_string().as_bytes()).is_ok());

        names.swap(11, 12);
        body["feature_names_in_"] = json!(names);
        let err = StandardScaler::from_json(body.to_string().as_bytes()).unwrap_err();
        assert!(err.contains("column 11"));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(StandardScaler::from_json(b"\x80\x04\x95pickle").is_err());
    }
}
