//! Math utilities: linear distance to wheel rotation
//!
//! The drive is commanded in motor degrees; field plans are written in
//! centimeters. Conversion depends only on the wheel diameter.

use crate::{Error, Result};

/// Wheel diameter of the stock drive base, in centimeters
pub const DEFAULT_WHEEL_DIAMETER_CM: f64 = 8.16;

/// Convert a linear distance to wheel rotation in degrees
///
/// `degrees = distance * 360 / (π * diameter)`. One full wheel turn covers
/// the wheel circumference.
///
/// # Errors
/// `InvalidParameter` if the distance is negative or non-finite, or the
/// diameter is non-positive or non-finite.
#[inline]
pub fn distance_to_degrees(distance_cm: f64, wheel_diameter_cm: f64) -> Result<f64> {
    if !distance_cm.is_finite() || distance_cm < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "distance must be finite and non-negative, got {distance_cm}"
        )));
    }
    if !wheel_diameter_cm.is_finite() || wheel_diameter_cm <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "wheel diameter must be finite and positive, got {wheel_diameter_cm}"
        )));
    }
    Ok(distance_cm * 360.0 / (std::f64::consts::PI * wheel_diameter_cm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance() {
        assert_relative_eq!(
            distance_to_degrees(0.0, DEFAULT_WHEEL_DIAMETER_CM).unwrap(),
            0.0
        );
        assert_relative_eq!(distance_to_degrees(0.0, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn test_one_circumference_is_full_turn() {
        let circumference = std::f64::consts::PI * DEFAULT_WHEEL_DIAMETER_CM;
        assert_relative_eq!(
            distance_to_degrees(circumference, DEFAULT_WHEEL_DIAMETER_CM).unwrap(),
            360.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_monotone_in_distance() {
        let mut prev = 0.0;
        for cm in 1..=50 {
            let deg = distance_to_degrees(cm as f64, DEFAULT_WHEEL_DIAMETER_CM).unwrap();
            assert!(deg > prev, "expected strictly increasing, {deg} <= {prev}");
            prev = deg;
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(distance_to_degrees(-1.0, 8.16).is_err());
        assert!(distance_to_degrees(f64::NAN, 8.16).is_err());
        assert!(distance_to_degrees(10.0, 0.0).is_err());
        assert!(distance_to_degrees(10.0, -8.16).is_err());
        assert!(distance_to_degrees(10.0, f64::INFINITY).is_err());
    }
}
