//! Straight drives bounded by a reflectance crossing
//!
//! Drives dead ahead until the floor under the sensor turns white (or
//! black), with a distance cap as a second terminator so a missed line
//! cannot carry the robot off the table.

use std::thread;

use tracing::{debug, warn};

use super::{stop_on_exit, Outcome, CYCLE_PERIOD};
use crate::config::LineCalibration;
use crate::control::AbortToken;
use crate::hardware::{ReflectanceSensor, RotationSensor, SteerableDrive};
use crate::math::{distance_to_degrees, DEFAULT_WHEEL_DIAMETER_CM};
use crate::Result;

/// Fixed drive speed, in percent
const STRAIGHT_SPEED: f64 = 20.0;

/// Drive straight until the sensor reads white or the distance cap is hit
pub fn forward_until_white(
    drive: &dyn SteerableDrive,
    sensor: &dyn ReflectanceSensor,
    odometer: &dyn RotationSensor,
    distance_cm: f64,
    cal: &LineCalibration,
    abort: &AbortToken,
) -> Result<Outcome> {
    forward_until(drive, sensor, odometer, distance_cm, cal, abort, true)
}

/// Drive straight until the sensor reads black or the distance cap is hit
pub fn forward_until_black(
    drive: &dyn SteerableDrive,
    sensor: &dyn ReflectanceSensor,
    odometer: &dyn RotationSensor,
    distance_cm: f64,
    cal: &LineCalibration,
    abort: &AbortToken,
) -> Result<Outcome> {
    forward_until(drive, sensor, odometer, distance_cm, cal, abort, false)
}

fn forward_until(
    drive: &dyn SteerableDrive,
    sensor: &dyn ReflectanceSensor,
    odometer: &dyn RotationSensor,
    distance_cm: f64,
    cal: &LineCalibration,
    abort: &AbortToken,
    until_white: bool,
) -> Result<Outcome> {
    cal.validate()?;
    let target_degrees = distance_to_degrees(distance_cm, DEFAULT_WHEEL_DIAMETER_CM)?;
    debug!(distance_cm, until_white, "straight drive to contrast");
    let loop_result = (|| -> Result<Outcome> {
        sensor.set_reflectance_mode()?;
        odometer.reset_position()?;
        loop {
            if abort.is_set() {
                warn!("straight drive aborted");
                return Ok(Outcome::Aborted);
            }
            let reading = sensor.reflectance()?;
            let crossed = if until_white {
                reading >= cal.white
            } else {
                reading <= cal.black
            };
            if crossed || odometer.position()? >= target_degrees {
                return Ok(Outcome::Completed);
            }
            drive.drive(0.0, STRAIGHT_SPEED)?;
            thread::sleep(CYCLE_PERIOD);
        }
    })();
    stop_on_exit(drive, loop_result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{MockDrive, MockReflectance};
    use approx::assert_relative_eq;

    fn cal() -> LineCalibration {
        LineCalibration::new(10.0, 90.0).unwrap()
    }

    #[test]
    fn test_stops_on_white() {
        let drive = MockDrive::with_advance(5.0);
        let sensor = MockReflectance::scripted([40.0, 40.0, 95.0]);

        let outcome =
            forward_until_white(&drive, &sensor, &drive, 100.0, &cal(), &AbortToken::new())
                .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(drive.commands().len(), 2);
        assert_eq!(drive.stop_count(), 1);
        for cmd in drive.commands() {
            assert_relative_eq!(cmd.steering, 0.0);
            assert_relative_eq!(cmd.speed, STRAIGHT_SPEED);
        }
    }

    #[test]
    fn test_stops_on_black() {
        let drive = MockDrive::with_advance(5.0);
        let sensor = MockReflectance::scripted([40.0, 40.0, 40.0, 5.0]);

        let outcome =
            forward_until_black(&drive, &sensor, &drive, 100.0, &cal(), &AbortToken::new())
                .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(drive.commands().len(), 3);
        assert_eq!(drive.stop_count(), 1);
    }

    #[test]
    fn test_distance_cap_terminates_without_crossing() {
        // Sensor never crosses; ~1 cm cap is ~14 degrees, 5 degrees/command.
        let drive = MockDrive::with_advance(5.0);
        let sensor = MockReflectance::constant(40.0);

        let outcome =
            forward_until_white(&drive, &sensor, &drive, 1.0, &cal(), &AbortToken::new())
                .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        assert_eq!(drive.commands().len(), 3);
        assert_eq!(drive.stop_count(), 1);
    }

    #[test]
    fn test_abort_pre_set_issues_only_stop() {
        let drive = MockDrive::with_advance(5.0);
        let sensor = MockReflectance::constant(40.0);
        let abort = AbortToken::new();
        abort.set();

        let outcome = forward_until_white(&drive, &sensor, &drive, 10.0, &cal(), &abort).unwrap();

        assert!(outcome.is_aborted());
        assert!(drive.commands().is_empty());
        assert_eq!(drive.stop_count(), 1);
    }
}
