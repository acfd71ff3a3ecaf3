//! PID line following
//!
//! Three variants of one loop: follow the line edge until a second sensor
//! sees the crossing line of an intersection, or until the drive has rolled
//! a target number of degrees, with the error sign picked by which side of
//! the line the sensor rides on.

use std::thread;

use tracing::{debug, warn};

use super::{stop_on_exit, Outcome, CYCLE_PERIOD};
use crate::config::LineCalibration;
use crate::control::{AbortToken, SteeringPid};
use crate::hardware::{ReflectanceSensor, RotationSensor, SteerableDrive};
use crate::{Error, Result};

/// Fixed drive speed while following, in percent
pub const CRUISE_SPEED: f64 = 20.0;

/// Follow the line until the secondary sensor crosses onto white
///
/// The loop steers on `primary` against the calibration midpoint and runs
/// while `secondary` reads at or below the white threshold. Used to stop at
/// an intersection, where the crossing line's far edge drives the secondary
/// reading high.
pub fn follow_until_intersection(
    drive: &dyn SteerableDrive,
    primary: &dyn ReflectanceSensor,
    secondary: &dyn ReflectanceSensor,
    cal: &LineCalibration,
    pid: &SteeringPid,
    abort: &AbortToken,
) -> Result<Outcome> {
    cal.validate()?;
    debug!(setpoint = cal.midpoint(), "line follow till intersection");
    let loop_result = (|| -> Result<Outcome> {
        primary.set_reflectance_mode()?;
        secondary.set_reflectance_mode()?;
        let setpoint = cal.midpoint();
        let mut last_error = 0.0;
        loop {
            if abort.is_set() {
                warn!("line follow aborted");
                return Ok(Outcome::Aborted);
            }
            if secondary.reflectance()? > cal.white {
                return Ok(Outcome::Completed);
            }
            let error = primary.reflectance()? - setpoint;
            drive.drive(pid.correction(error, last_error), CRUISE_SPEED)?;
            last_error = error;
            thread::sleep(CYCLE_PERIOD);
        }
    })();
    stop_on_exit(drive, loop_result)
}

/// Follow the line for a rotation distance, sensor left of the line
///
/// Resets the odometer, then follows until it reports `target_degrees`.
pub fn follow_for_degrees(
    drive: &dyn SteerableDrive,
    primary: &dyn ReflectanceSensor,
    odometer: &dyn RotationSensor,
    target_degrees: f64,
    cal: &LineCalibration,
    pid: &SteeringPid,
    abort: &AbortToken,
) -> Result<Outcome> {
    follow_distance(
        drive,
        primary,
        odometer,
        target_degrees,
        cal,
        pid,
        abort,
        false,
    )
}

/// Follow the line for a rotation distance, sensor right of the line
///
/// Identical to [`follow_for_degrees`] with the error sign inverted.
pub fn follow_for_degrees_right(
    drive: &dyn SteerableDrive,
    primary: &dyn ReflectanceSensor,
    odometer: &dyn RotationSensor,
    target_degrees: f64,
    cal: &LineCalibration,
    pid: &SteeringPid,
    abort: &AbortToken,
) -> Result<Outcome> {
    follow_distance(
        drive,
        primary,
        odometer,
        target_degrees,
        cal,
        pid,
        abort,
        true,
    )
}

#[allow(clippy::too_many_arguments)]
fn follow_distance(
    drive: &dyn SteerableDrive,
    primary: &dyn ReflectanceSensor,
    odometer: &dyn RotationSensor,
    target_degrees: f64,
    cal: &LineCalibration,
    pid: &SteeringPid,
    abort: &AbortToken,
    invert_error: bool,
) -> Result<Outcome> {
    cal.validate()?;
    if !target_degrees.is_finite() || target_degrees < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "target rotation must be finite and non-negative, got {target_degrees}"
        )));
    }
    debug!(target_degrees, invert_error, "line follow for distance");
    let loop_result = (|| -> Result<Outcome> {
        primary.set_reflectance_mode()?;
        odometer.reset_position()?;
        let setpoint = cal.midpoint();
        let mut last_error = 0.0;
        loop {
            if abort.is_set() {
                warn!("line follow aborted");
                return Ok(Outcome::Aborted);
            }
            if odometer.position()? >= target_degrees {
                return Ok(Outcome::Completed);
            }
            let mut error = primary.reflectance()? - setpoint;
            if invert_error {
                error = -error;
            }
            drive.drive(pid.correction(error, last_error), CRUISE_SPEED)?;
            last_error = error;
            thread::sleep(CYCLE_PERIOD);
        }
    })();
    stop_on_exit(drive, loop_result)
}
