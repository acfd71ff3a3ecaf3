//! Velocity-ramped point-to-point moves
//!
//! Open-loop speed ramps: the setpoint is a function of elapsed wheel
//! rotation, not of any sensor, which bounds instantaneous torque and wheel
//! slip. The three cycle periods are deliberately different - the speed
//! delta divided by the period is the acceleration, so coarser ramp pacing
//! than hold pacing is what sets the ramp's gentleness.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::{stop_on_exit, Outcome};
use crate::control::AbortToken;
use crate::hardware::{RotationSensor, SteerableDrive};
use crate::{Error, Result};

/// Speed change per ramp cycle, in percent
pub const SPEED_STEP: f64 = 5.0;
/// The forward ramp stops shedding speed below this, in percent
pub const DECEL_FLOOR: f64 = 10.0;
/// Fraction of the target distance covered before deceleration begins
pub const ACCEL_FRACTION: f64 = 0.8;

/// Pacing while changing speed upward
const RAMP_PERIOD: Duration = Duration::from_millis(100);
/// Pacing while shedding speed near the target
const DECEL_PERIOD: Duration = Duration::from_millis(50);
/// Pacing while holding a steady speed
const HOLD_PERIOD: Duration = Duration::from_millis(10);

/// Drive forward over `target_degrees` with a trapezoidal speed ramp
///
/// Accelerates in [`SPEED_STEP`] increments up to `final_speed`, holds, and
/// over the final 20% of the distance sheds speed down to [`DECEL_FLOOR`].
/// A position exactly at the 80% threshold already belongs to the
/// deceleration phase. Steering is held constant.
pub fn accelerate(
    drive: &dyn SteerableDrive,
    odometer: &dyn RotationSensor,
    target_degrees: f64,
    final_speed: f64,
    steering: f64,
    abort: &AbortToken,
) -> Result<Outcome> {
    validate_target(target_degrees)?;
    debug!(target_degrees, final_speed, steering, "accelerated move");
    let loop_result = (|| -> Result<Outcome> {
        odometer.reset_position()?;
        let accel_threshold = target_degrees * ACCEL_FRACTION;
        let mut speed = 0.0;
        loop {
            if abort.is_set() {
                warn!("accelerated move aborted");
                return Ok(Outcome::Aborted);
            }
            let position = odometer.position()?;
            if position >= target_degrees {
                return Ok(Outcome::Completed);
            }
            if position < accel_threshold {
                if speed < final_speed {
                    speed += SPEED_STEP;
                    drive.drive(steering, speed)?;
                    thread::sleep(RAMP_PERIOD);
                } else {
                    drive.drive(steering, final_speed)?;
                    thread::sleep(HOLD_PERIOD);
                }
            } else if speed > DECEL_FLOOR {
                speed -= SPEED_STEP;
                drive.drive(steering, speed)?;
                thread::sleep(DECEL_PERIOD);
            } else {
                drive.drive(steering, speed)?;
                thread::sleep(HOLD_PERIOD);
            }
        }
    })();
    stop_on_exit(drive, loop_result)
}

/// Drive backward over `target_degrees` with a speed ramp
///
/// Speed falls by [`SPEED_STEP`] per cycle until it reaches
/// `-|final_speed|`, then holds there; there is no deceleration phase near
/// the target. The rotation target is compared by magnitude since the
/// counter runs negative.
pub fn accelerate_backward(
    drive: &dyn SteerableDrive,
    odometer: &dyn RotationSensor,
    target_degrees: f64,
    final_speed: f64,
    steering: f64,
    abort: &AbortToken,
) -> Result<Outcome> {
    validate_target(target_degrees)?;
    debug!(target_degrees, final_speed, steering, "accelerated move backward");
    let loop_result = (|| -> Result<Outcome> {
        odometer.reset_position()?;
        let floor = -final_speed.abs();
        let mut speed = 0.0;
        loop {
            if abort.is_set() {
                warn!("accelerated move backward aborted");
                return Ok(Outcome::Aborted);
            }
            if odometer.position()?.abs() >= target_degrees {
                return Ok(Outcome::Completed);
            }
            if speed > floor {
                speed -= SPEED_STEP;
                drive.drive(steering, speed)?;
                thread::sleep(RAMP_PERIOD);
            } else {
                drive.drive(steering, floor)?;
                thread::sleep(HOLD_PERIOD);
            }
        }
    })();
    stop_on_exit(drive, loop_result)
}

fn validate_target(target_degrees: f64) -> Result<()> {
    if !target_degrees.is_finite() || target_degrees < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "target rotation must be finite and non-negative, got {target_degrees}"
        )));
    }
    Ok(())
}
