//! Hardware abstraction
//!
//! Capability traits for the drive base and sensors, plus mock
//! implementations so every control loop can run against simulated hardware.

pub mod mock;
mod traits;

pub use traits::{
    AbortInput, HeadingMode, HeadingSensor, ReflectanceSensor, RotationSensor, SteerableDrive,
    TextDisplay, WheelMotor,
};
