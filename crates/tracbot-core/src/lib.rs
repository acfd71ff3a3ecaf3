//! tracbot-core: motion control for a differential-drive line-following robot
//!
//! A closed-loop controller for a two-wheel robot that follows a reflectance
//! contrast (black line on white floor) and performs precise maneuvers:
//! PID line following, line squaring, gyro-assisted turns, and velocity-ramped
//! point-to-point moves.
//!
//! # Modules
//!
//! - [`math`] - Unit conversion between linear distance and wheel rotation
//! - [`config`] - Reflectance calibration (black/white thresholds)
//! - [`control`] - Steering PID and cooperative abort signalling
//! - [`hardware`] - Hardware capability traits and mock implementations
//! - [`maneuver`] - Blocking control loops built on the above
//!
//! # Architecture
//!
//! ```text
//! AbortInput (button) ──► AbortWatch ──► AbortToken
//!                                            │ checked every cycle
//! ReflectanceSensor ──► error ──► SteeringPid ──► SteerableDrive
//! ```
//!
//! All control loops are blocking, polling loops paced by fixed sleeps. The
//! hardware is injected as trait objects, so every loop runs unchanged against
//! the mocks in [`hardware::mock`].

#![warn(unused_must_use)]

pub mod config;
pub mod control;
pub mod hardware;
pub mod maneuver;
pub mod math;

// Re-exports for convenience
pub use config::LineCalibration;
pub use control::{AbortToken, AbortWatch, SteeringPid};
pub use hardware::{
    AbortInput, HeadingMode, HeadingSensor, ReflectanceSensor, RotationSensor, SteerableDrive,
    TextDisplay, WheelMotor,
};
pub use maneuver::Outcome;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for tracbot-core
///
/// A user-requested abort is not an error: maneuvers report it through
/// [`maneuver::Outcome::Aborted`]. Errors are reserved for faulty inputs and
/// failing collaborators.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors must be handled or explicitly ignored with let _ = ..."]
#[non_exhaustive]
pub enum Error {
    /// A sensor or actuator failed mid-loop.
    /// Handle by: stopping the robot and checking cabling/ports; continuing a
    /// blind control loop is unsafe, so the core propagates rather than masks.
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// A caller-supplied parameter is out of range (e.g. non-positive wheel
    /// diameter, negative distance).
    /// Handle by: validating inputs at the call site.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid calibration (e.g. black threshold not below white).
    /// Handle by: re-running sensor calibration before driving.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for tracbot-core operations
pub type Result<T> = std::result::Result<T, Error>;
