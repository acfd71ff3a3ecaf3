//! Blocking maneuvers
//!
//! Each maneuver is a synchronous, CPU-light polling loop over injected
//! hardware handles, paced by fixed sleeps and terminated by a sensor
//! condition, a rotation target, or the abort token. Per-maneuver state
//! (last PID error, ramp speed) lives on the stack of the call and dies with
//! it.
//!
//! Every loop's exit path - normal, target reached, aborted, or a
//! collaborator fault - issues a stop command to the actuator it was driving
//! before the result propagates. That is the one hard resource-release
//! invariant in this crate.

pub mod drive;
pub mod line;
pub mod motion;
pub mod square;
pub mod turn;

pub use drive::{forward_until_black, forward_until_white};
pub use line::{follow_for_degrees, follow_for_degrees_right, follow_until_intersection};
pub use motion::{accelerate, accelerate_backward};
pub use square::square_on_line;
pub use turn::{gyro_drift_check, gyro_turn};

use std::time::Duration;

use crate::hardware::SteerableDrive;
use crate::Result;

/// How a maneuver ended
///
/// An abort is a normal, checked termination, not an error; hardware faults
/// travel through [`crate::Error`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The termination condition was met
    Completed,
    /// The abort token was observed set
    Aborted,
}

impl Outcome {
    /// Whether the maneuver was cut short by the abort token
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

/// Sensor-terminated loops poll at this period
pub(crate) const CYCLE_PERIOD: Duration = Duration::from_millis(10);

/// Stop the drive on every exit path, then surface the loop's own result
///
/// The loop error wins over a stop error: a failing sensor is the root
/// cause, a failing stop on top of it is reported only when the loop itself
/// succeeded.
pub(crate) fn stop_on_exit(drive: &dyn SteerableDrive, loop_result: Result<Outcome>) -> Result<Outcome> {
    let stop_result = drive.stop();
    let outcome = loop_result?;
    stop_result?;
    Ok(outcome)
}
