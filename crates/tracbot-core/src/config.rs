//! Reflectance calibration
//!
//! Black/white threshold pair measured on the competition surface. The
//! midpoint between the two is the line-edge setpoint every line-follow loop
//! steers towards.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Calibrated reflectance thresholds
///
/// Readings are reflected-light intensity in the sensor's 0-100 range.
/// Invariant: `black < white`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineCalibration {
    /// Intensity measured on the line
    pub black: f64,
    /// Intensity measured on the open floor
    pub white: f64,
}

impl Default for LineCalibration {
    fn default() -> Self {
        Self {
            black: 10.0,
            white: 90.0,
        }
    }
}

impl LineCalibration {
    /// Create a calibration from measured black/white intensities
    pub fn new(black: f64, white: f64) -> Result<Self> {
        let cal = Self { black, white };
        cal.validate()?;
        Ok(cal)
    }

    /// Check the calibration invariants
    pub fn validate(&self) -> Result<()> {
        if !self.black.is_finite() || !self.white.is_finite() {
            return Err(Error::Config("thresholds must be finite".into()));
        }
        if !(0.0..=100.0).contains(&self.black) || !(0.0..=100.0).contains(&self.white) {
            return Err(Error::Config(format!(
                "thresholds must be within 0..=100, got black={} white={}",
                self.black, self.white
            )));
        }
        if self.black >= self.white {
            return Err(Error::Config(format!(
                "black threshold ({}) must be below white ({})",
                self.black, self.white
            )));
        }
        Ok(())
    }

    /// The line-edge setpoint: halfway between black and white
    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.black + self.white) / 2.0
    }
}
