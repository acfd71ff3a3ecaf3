//! Gyro-assisted turns and drift calibration
//!
//! Turning uses heading feedback instead of reflectance: the drive is
//! commanded at a constant steering bias while the heading sensor blocks
//! until the requested angle change has occurred.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::{stop_on_exit, Outcome};
use crate::control::AbortToken;
use crate::hardware::{HeadingMode, HeadingSensor, SteerableDrive, TextDisplay};
use crate::{Error, Result};

/// Fixed drive speed while turning, in percent
pub const TURN_SPEED: f64 = 15.0;

/// Polling period of the drift check
const DRIFT_POLL_PERIOD: Duration = Duration::from_millis(500);

/// Turn until the heading has changed by `angle_degrees`
///
/// The turn direction comes from `steering`; the angle is taken by
/// magnitude. Blocks in the sensor's wait call, so the only abort window is
/// before the turn starts - a turn in progress runs to its angle.
pub fn gyro_turn(
    drive: &dyn SteerableDrive,
    heading: &dyn HeadingSensor,
    steering: f64,
    angle_degrees: f64,
    abort: &AbortToken,
) -> Result<Outcome> {
    if !angle_degrees.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "turn angle must be finite, got {angle_degrees}"
        )));
    }
    if abort.is_set() {
        warn!("gyro turn aborted before start");
        return Ok(Outcome::Aborted);
    }
    debug!(steering, angle_degrees, "gyro turn");
    heading.set_mode(HeadingMode::RelativeAngle)?;
    let loop_result = (|| -> Result<Outcome> {
        drive.drive(steering, TURN_SPEED)?;
        heading.wait_until_angle_changed_by(angle_degrees.abs())?;
        Ok(Outcome::Completed)
    })();
    stop_on_exit(drive, loop_result)
}

/// Report gyro drift until the sensor reads steady
///
/// Diagnostic run before a match with the robot held still: polls the rate
/// mode and shows each non-zero reading on the display. Returns once the
/// rate reads zero (or the abort token is set) and leaves the sensor in
/// relative-angle mode either way.
pub fn gyro_drift_check(
    heading: &dyn HeadingSensor,
    display: &dyn TextDisplay,
    abort: &AbortToken,
) -> Result<Outcome> {
    heading.set_mode(HeadingMode::Rate)?;
    let mut outcome = Outcome::Completed;
    loop {
        if abort.is_set() {
            warn!("drift check aborted");
            outcome = Outcome::Aborted;
            break;
        }
        let rate = heading.rate()?;
        if rate.abs() == 0.0 {
            break;
        }
        display.show_text(&format!("Gyro drift rate: {rate}"))?;
        thread::sleep(DRIFT_POLL_PERIOD);
    }
    heading.set_mode(HeadingMode::RelativeAngle)?;
    Ok(outcome)
}
