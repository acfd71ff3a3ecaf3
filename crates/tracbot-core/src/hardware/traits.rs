//! Hardware capability traits
//!
//! Defines the interfaces the control loops consume, enabling the same code
//! to run on the real drive base or against mocks. A composition root
//! constructs concrete handles once and passes them down; the core never
//! holds hidden device singletons.
//!
//! All methods are fallible: a sensor or actuator fault must surface in the
//! loop that depends on it, never be masked.

use crate::Result;

/// A differential drive commanded with a steering bias and a speed
///
/// Steering is in [-100, 100]: 0 drives straight, ±100 spins in place.
/// Speed is in percent of full motor speed; negative drives backward.
pub trait SteerableDrive: Send + Sync {
    /// Run the drive with the given steering bias and speed
    fn drive(&self, steering: f64, speed_percent: f64) -> Result<()>;

    /// Stop both motors
    fn stop(&self) -> Result<()>;
}

/// A single drive motor, addressed independently of the steerable pair
pub trait WheelMotor: Send + Sync {
    /// Run the motor at the given speed in percent
    fn run(&self, speed_percent: f64) -> Result<()>;

    /// Stop the motor
    fn stop(&self) -> Result<()>;
}

/// Cumulative rotation counter of a drive motor
pub trait RotationSensor: Send + Sync {
    /// Reset the counter to zero
    fn reset_position(&self) -> Result<()>;

    /// Current rotation in signed degrees since the last reset
    fn position(&self) -> Result<f64>;
}

/// A reflected-light intensity sensor aimed at the floor
pub trait ReflectanceSensor: Send + Sync {
    /// Switch the sensor into reflected-light mode
    fn set_reflectance_mode(&self) -> Result<()>;

    /// Read the current intensity (0-100, device-defined scaling)
    fn reflectance(&self) -> Result<f64>;
}

/// Operating mode of the heading sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingMode {
    /// Report angular rate in degrees per second
    Rate,
    /// Report angle relative to the position at the mode switch
    RelativeAngle,
}

/// A gyro reporting heading rate and relative angle changes
pub trait HeadingSensor: Send + Sync {
    /// Switch the sensor's operating mode
    fn set_mode(&self, mode: HeadingMode) -> Result<()>;

    /// Current angular rate in degrees per second (rate mode)
    fn rate(&self) -> Result<f64>;

    /// Block until the heading has changed by the given magnitude in degrees
    fn wait_until_angle_changed_by(&self, degrees: f64) -> Result<()>;
}

/// The physical input that requests an abort
///
/// Read by the background [`AbortWatch`](crate::control::AbortWatch) task
/// only; control loops see the latched token, not the raw input.
pub trait AbortInput: Send + Sync {
    /// Whether the input is currently active
    #[must_use]
    fn is_pressed(&self) -> bool;
}

/// Text output for diagnostics (e.g. gyro drift calibration)
pub trait TextDisplay: Send + Sync {
    /// Show a line of text
    fn show_text(&self, text: &str) -> Result<()>;
}
