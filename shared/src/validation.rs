//! Validation of prediction form input
//!
//! Bounds follow the form widgets: month 1-12, day 1-31, hour 0-23 and a
//! non-negative visibility. Day-of-month is also checked against the month.

use thiserror::Error;

use crate::models::RawInput;

/// Reasons a form submission is rejected before encoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),

    #[error("day must be between 1 and 31, got {0}")]
    DayOutOfRange(u32),

    #[error("month {month} has no day {day}")]
    DayNotInMonth { month: u32, day: u32 },

    #[error("hour must be between 0 and 23, got {0}")]
    HourOutOfRange(u32),

    #[error("visibility cannot be negative, got {0}")]
    NegativeVisibility(f64),

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

impl InputError {
    /// Name of the offending form field
    pub fn field(&self) -> &'static str {
        match self {
            InputError::MonthOutOfRange(_) => "month",
            InputError::DayOutOfRange(_) | InputError::DayNotInMonth { .. } => "day",
            InputError::HourOutOfRange(_) => "hour",
            InputError::NegativeVisibility(_) => "visibility",
            InputError::NotFinite { field } => *field,
        }
    }
}

/// Validate month range
pub fn validate_month(month: u32) -> Result<(), InputError> {
    if !(1..=12).contains(&month) {
        return Err(InputError::MonthOutOfRange(month));
    }
    Ok(())
}

/// Validate hour range
pub fn validate_hour(hour: u32) -> Result<(), InputError> {
    if hour > 23 {
        return Err(InputError::HourOutOfRange(hour));
    }
    Ok(())
}

/// Longest the given month can be; February counts 29 since no year is entered
pub fn days_in_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Validate day range and that the day exists in the month
pub fn validate_day_of_month(month: u32, day: u32) -> Result<(), InputError> {
    if !(1..=31).contains(&day) {
        return Err(InputError::DayOutOfRange(day));
    }
    if day > days_in_month(month) {
        return Err(InputError::DayNotInMonth { month, day });
    }
    Ok(())
}

/// Validate the whole form before encoding
pub fn validate_raw_input(raw: &RawInput) -> Result<(), InputError> {
    validate_month(raw.month)?;
    validate_day_of_month(raw.month, raw.day)?;
    validate_hour(raw.hour)?;

    let measurements = [
        ("temperature", raw.temperature),
        ("humidity", raw.humidity),
        ("wind_speed", raw.wind_speed),
        ("visibility", raw.visibility),
        ("dew_point_temperature", raw.dew_point_temperature),
        ("solar_radiation", raw.solar_radiation),
        ("rainfall", raw.rainfall),
        ("snowfall", raw.snowfall),
    ];
    for (field, value) in measurements {
        if !value.is_finite() {
            return Err(InputError::NotFinite { field });
        }
    }

    if raw.visibility < 0.0 {
        return Err(InputError::NegativeVisibility(raw.visibility));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_input_is_valid() {
        assert!(validate_raw_input(&RawInput::default()).is_ok());
    }

    #[test]
    fn test_month_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert_eq!(validate_month(0), Err(InputError::MonthOutOfRange(0)));
        assert_eq!(validate_month(13), Err(InputError::MonthOutOfRange(13)));
    }

    #[test]
    fn test_hour_bounds() {
        assert!(validate_hour(0).is_ok());
        assert!(validate_hour(23).is_ok());
        assert_eq!(validate_hour(24), Err(InputError::HourOutOfRange(24)));
    }

    #[test]
    fn test_day_of_month() {
        assert!(validate_day_of_month(1, 31).is_ok());
        assert!(validate_day_of_month(2, 29).is_ok());
        assert_eq!(
            validate_day_of_month(2, 30),
            Err(InputError::DayNotInMonth { month: 2, day: 30 })
        );
        assert_eq!(
            validate_day_of_month(4, 31),
            Err(InputError::DayNotInMonth { month: 4, day: 31 })
        );
        assert_eq!(validate_day_of_month(5, 0), Err(InputError::DayOutOfRange(0)));
        assert_eq!(validate_day_of_month(5, 32), Err(InputError::DayOutOfRange(32)));
    }

    #[test]
    fn test_negative_visibility_rejected() {
        let raw = RawInput {
            visibility: -1.0,
            ..RawInput::default()
        };
        let err = validate_raw_input(&raw).unwrap_err();
        assert_eq!(err.field(), "visibility");
    }

    #[test]
    fn test_negative_measurements_allowed() {
        let raw = RawInput {
            temperature: -17.8,
            dew_point_temperature: -30.6,
            ..RawInput::default()
        };
        assert!(validate_raw_input(&raw).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let raw = RawInput {
            rainfall: f64::NAN,
            ..RawInput::default()
        };
        assert_eq!(
            validate_raw_input(&raw),
            Err(InputError::NotFinite { field: "rainfall" })
        );
    }

    #[test]
    fn test_error_fields() {
        assert_eq!(InputError::MonthOutOfRange(0).field(), "month");
        assert_eq!(InputError::DayNotInMonth { month: 2, day: 30 }.field(), "day");
        assert_eq!(InputError::HourOutOfRange(99).field(), "hour");
    }
}
