//! Validation of raw sensor readings.
//!
//! Readings arrive as arbitrary JSON. Only the `distance` field is
//! inspected; everything else in the payload is ignored.

use serde_json::Value;

/// The single domain error of the ingestion pipeline.
///
/// Raised when `distance` is missing, not a JSON number, or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid distance value")]
pub struct ValidationError;

/// Extract a valid distance (in centimeters) from a raw reading.
///
/// # Errors
///
/// Returns [`ValidationError`] if `raw` is not an object with a
/// non-negative numeric `distance` field.
pub fn validate_reading(raw: &Value) -> Result<f64, ValidationError> {
    let distance = raw
        .get("distance")
        .and_then(Value::as_f64)
        .ok_or(ValidationError)?;

    if distance.is_finite() && distance >= 0.0 {
        Ok(distance)
    } else {
        Err(ValidationError)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_integers_and_floats() {
        assert_eq!(validate_reading(&json!({ "distance": 10 })).unwrap(), 10.0);
        assert_eq!(validate_reading(&json!({ "distance": 45.5 })).unwrap(), 45.5);
        assert_eq!(validate_reading(&json!({ "distance": 0 })).unwrap(), 0.0);
    }

    #[test]
    fn ignores_other_fields() {
        let raw = json!({ "distance": 80, "sensor": "hall", "battery": -1 });
        assert_eq!(validate_reading(&raw).unwrap(), 80.0);
    }

    #[test]
    fn rejects_negative_distance() {
        assert_eq!(
            validate_reading(&json!({ "distance": -5 })),
            Err(ValidationError)
        );
    }

    #[test]
    fn rejects_non_numeric_distance() {
        assert!(validate_reading(&json!({ "distance": "far" })).is_err());
        assert!(validate_reading(&json!({ "distance": "10" })).is_err());
        assert!(validate_reading(&json!({ "distance": null })).is_err());
        assert!(validate_reading(&json!({ "distance": true })).is_err());
    }

    #[test]
    fn rejects_missing_distance() {
        assert!(validate_reading(&json!({})).is_err());
        assert!(validate_reading(&json!([10])).is_err());
        assert!(validate_reading(&json!(10)).is_err());
    }

    #[test]
    fn error_message_is_client_facing() {
        assert_eq!(ValidationError.to_string(), "Invalid distance value");
    }
}
