//! Validation utilities for the Spaza Compliance Portal
//!
//! Checks applied to registration forms and official input. None of these
//! are applied inside the scoring or distance code, which accepts whatever
//! data it is given.

use crate::models::{DayHours, TradingHours, MAX_COMPLIANCE_SCORE};

// ============================================================================
// Shop Validations
// ============================================================================

/// Validate a manually entered compliance or inspection score
pub fn validate_compliance_score(score: i32) -> Result<(), &'static str> {
    if !(0..=MAX_COMPLIANCE_SCORE).contains(&score) {
        return Err("Score must be between 0 and 100");
    }
    Ok(())
}

/// Validate a latitude/longitude pair captured on a form.
///
/// Both or neither must be supplied.
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), &'static str> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) => {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err("Latitude must be between -90 and 90");
            }
            if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
                return Err("Longitude must be between -180 and 180");
            }
            Ok(())
        }
        _ => Err("Latitude and longitude must be provided together"),
    }
}

/// Validate one day of trading hours
pub fn validate_day_hours(hours: &DayHours) -> Result<(), &'static str> {
    if hours.closed {
        return Ok(());
    }
    match (hours.open, hours.close) {
        (Some(open), Some(close)) if open < close => Ok(()),
        (Some(_), Some(_)) => Err("Closing time must be after opening time"),
        _ => Err("Opening and closing times are required unless the shop is closed"),
    }
}

/// Validate a full week of trading hours
pub fn validate_trading_hours(hours: &TradingHours) -> Result<(), &'static str> {
    hours.values().try_for_each(validate_day_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(-26.2041), Some(28.0473)).is_ok());
        assert!(validate_coordinates(Some(-26.2041), None).is_err());
        assert!(validate_coordinates(Some(91.0), Some(28.0)).is_err());
        assert!(validate_coordinates(Some(-26.0), Some(181.0)).is_err());
    }

    #[test]
    fn test_validate_day_hours() {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        assert!(validate_day_hours(&DayHours::open_between(t(8), t(18))).is_ok());
        assert!(validate_day_hours(&DayHours::open_between(t(18), t(8))).is_err());
        assert!(validate_day_hours(&DayHours::closed()).is_ok());
        assert!(validate_day_hours(&DayHours::default()).is_err());
    }

    #[test]
    fn test_validate_compliance_score() {
        assert!(validate_compliance_score(0).is_ok());
        assert!(validate_compliance_score(100).is_ok());
        assert!(validate_compliance_score(101).is_err());
        assert!(validate_compliance_score(-1).is_err());
    }
}
