//! Steering PID controller
//!
//! Converts a reflectance error into a steering correction for the drive.
//! The controller holds no state between cycles; the loop threads the
//! previous cycle's error through each call, which keeps the math trivially
//! testable and the loop free to reset it on entry.

use serde::{Deserialize, Serialize};

/// Lower clamp of the steering correction
pub const STEERING_MIN: f64 = -100.0;
/// Upper clamp of the steering correction
pub const STEERING_MAX: f64 = 100.0;

/// Steering PID gains
///
/// # Example
/// ```
/// use tracbot_core::SteeringPid;
///
/// let pid = SteeringPid::p(1.2);
/// let correction = pid.correction(10.0, 0.0);
/// assert_eq!(correction, 12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringPid {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
}

impl Default for SteeringPid {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
        }
    }
}

impl SteeringPid {
    /// Create a controller with the given gains
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    /// Create a P-only controller
    pub fn p(kp: f64) -> Self {
        Self::new(kp, 0.0, 0.0)
    }

    /// Create a PI controller
    pub fn pi(kp: f64, ki: f64) -> Self {
        Self::new(kp, ki, 0.0)
    }

    /// Create a PD controller
    pub fn pd(kp: f64, kd: f64) -> Self {
        Self::new(kp, 0.0, kd)
    }

    /// Compute the steering correction for one cycle
    ///
    /// The "integral" term is the sum of the current and previous error, not
    /// an accumulated running total. This is intentional and tuning depends
    /// on it; do not replace it with a textbook integrator.
    ///
    /// The result is clamped to [`STEERING_MIN`]..=[`STEERING_MAX`].
    #[inline]
    #[must_use]
    pub fn correction(&self, error: f64, last_error: f64) -> f64 {
        let proportional = error * self.kp;
        let integral = (error + last_error) * self.ki;
        let derivative = (error - last_error) * self.kd;
        (proportional + integral + derivative).clamp(STEERING_MIN, STEERING_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_p_only() {
        let pid = SteeringPid::new(1.0, 0.0, 0.0);
        assert_relative_eq!(pid.correction(10.0, 0.0), 10.0);
        assert_relative_eq!(pid.correction(-7.5, 0.0), -7.5);
    }

    #[test]
    fn test_full_pid_formula() {
        // P = 10, I = (10 + 10) * 1 = 20, D = (10 - 10) * 1 = 0
        let pid = SteeringPid::new(1.0, 1.0, 1.0);
        assert_relative_eq!(pid.correction(10.0, 10.0), 30.0);
    }

    #[test]
    fn test_derivative_term() {
        let pid = SteeringPid::pd(0.0, 2.0);
        assert_relative_eq!(pid.correction(5.0, 2.0), 6.0);
        assert_relative_eq!(pid.correction(2.0, 5.0), -6.0);
    }

    #[test]
    fn test_integral_is_sum_not_accumulator() {
        // Identical inputs must yield identical outputs: no hidden state.
        let pid = SteeringPid::pi(0.0, 1.0);
        assert_relative_eq!(pid.correction(3.0, 4.0), 7.0);
        assert_relative_eq!(pid.correction(3.0, 4.0), 7.0);
    }

    #[test]
    fn test_clamp_holds_at_all_magnitudes() {
        let pid = SteeringPid::new(1e6, 1e6, 1e6);
        for error in [-1e6, -100.0, -1.0, 1.0, 100.0, 1e6] {
            let out = pid.correction(error, 0.0);
            assert!(
                (STEERING_MIN..=STEERING_MAX).contains(&out),
                "unclamped output {out} for error {error}"
            );
        }
        assert_relative_eq!(pid.correction(1e6, 0.0), STEERING_MAX);
        assert_relative_eq!(pid.correction(-1e6, 0.0), STEERING_MIN);
    }
}
