//! Control primitives
//!
//! The steering PID that turns a reflectance error into a drive correction,
//! and the cooperative abort signal every control loop polls.

mod abort;
mod pid;

pub use abort::{AbortToken, AbortWatch};
pub use pid::{SteeringPid, STEERING_MAX, STEERING_MIN};
