//! Line squaring
//!
//! Drives each wheel independently until its own sensor finds the line, so
//! the robot's axle ends up parallel to it. The two wheel-stop loops must
//! run truly concurrently - running them back to back skews the chassis -
//! so each pass forks them onto scoped threads and joins both before backing
//! off for the next pass.

use std::thread;

use tracing::{debug, warn};

use super::{accelerate_backward, Outcome, CYCLE_PERIOD};
use crate::config::LineCalibration;
use crate::control::AbortToken;
use crate::hardware::{ReflectanceSensor, RotationSensor, SteerableDrive, WheelMotor};
use crate::math::{distance_to_degrees, DEFAULT_WHEEL_DIAMETER_CM};
use crate::{Error, Result};

/// Wheel speed while creeping onto the line, in percent
pub const SQUARING_SPEED: f64 = 10.0;
/// Distance backed off between passes, in centimeters
pub const BACKOFF_CM: f64 = 1.0;
/// Final speed of the backoff ramp, in percent
pub const BACKOFF_SPEED: f64 = 20.0;
/// Approach-and-backoff passes per maneuver
const SQUARE_PASSES: u32 = 2;

/// Square the robot against the line
///
/// Each pass creeps both wheels forward until each one's sensor reads the
/// line (at or below the black threshold), joins both wheel loops, then
/// backs off [`BACKOFF_CM`] and repeats. The join blocks until both
/// sub-loops have returned; both observe the abort token within one cycle
/// period.
#[allow(clippy::too_many_arguments)]
pub fn square_on_line(
    left_motor: &dyn WheelMotor,
    right_motor: &dyn WheelMotor,
    drive: &dyn SteerableDrive,
    odometer: &dyn RotationSensor,
    left_sensor: &dyn ReflectanceSensor,
    right_sensor: &dyn ReflectanceSensor,
    cal: &LineCalibration,
    abort: &AbortToken,
) -> Result<Outcome> {
    cal.validate()?;
    if abort.is_set() {
        return Ok(Outcome::Aborted);
    }
    debug!(black = cal.black, "squaring on line");
    left_sensor.set_reflectance_mode()?;
    right_sensor.set_reflectance_mode()?;
    let backoff_degrees = distance_to_degrees(BACKOFF_CM, DEFAULT_WHEEL_DIAMETER_CM)?;

    for pass in 0..SQUARE_PASSES {
        if abort.is_set() {
            warn!(pass, "squaring aborted");
            return Ok(Outcome::Aborted);
        }

        let (left_result, right_result) = thread::scope(|s| {
            let left = s.spawn(|| wheel_stop_loop(left_motor, left_sensor, cal, abort));
            let right = s.spawn(|| wheel_stop_loop(right_motor, right_sensor, cal, abort));
            (left.join(), right.join())
        });
        left_result.map_err(|_| Error::Hardware("left wheel task panicked".into()))??;
        right_result.map_err(|_| Error::Hardware("right wheel task panicked".into()))??;

        let backed_off = accelerate_backward(
            drive,
            odometer,
            backoff_degrees,
            BACKOFF_SPEED,
            0.0,
            abort,
        )?;
        if backed_off.is_aborted() {
            warn!(pass, "squaring aborted during backoff");
            return Ok(Outcome::Aborted);
        }
    }

    Ok(Outcome::Completed)
}

/// Creep one wheel forward until its sensor reads the line, then stop it
///
/// The motor is stopped on every exit path, including a sensor fault.
fn wheel_stop_loop(
    motor: &dyn WheelMotor,
    sensor: &dyn ReflectanceSensor,
    cal: &LineCalibration,
    abort: &AbortToken,
) -> Result<()> {
    let loop_result = (|| -> Result<()> {
        while sensor.reflectance()? > cal.black && !abort.is_set() {
            motor.run(SQUARING_SPEED)?;
            thread::sleep(CYCLE_PERIOD);
        }
        Ok(())
    })();
    let stop_result = motor.stop();
    loop_result?;
    stop_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{FaultyReflectance, MockDrive, MockMotor, MockReflectance};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn cal() -> LineCalibration {
        LineCalibration::new(10.0, 90.0).unwrap()
    }

    #[test]
    fn test_both_wheels_stop_on_their_own_sensor() {
        let left_motor = MockMotor::new();
        let right_motor = MockMotor::new();
        let drive = MockDrive::with_advance(5.0);
        // Left finds the line after 2 readings, right after 4; the script's
        // last value repeats, so each pass replays the final dark reading.
        let left_sensor = MockReflectance::scripted([60.0, 55.0, 8.0]);
        let right_sensor = MockReflectance::scripted([60.0, 58.0, 55.0, 40.0, 7.0]);

        let outcome = square_on_line(
            &left_motor,
            &right_motor,
            &drive,
            &drive,
            &left_sensor,
            &right_sensor,
            &cal(),
            &AbortToken::new(),
        )
        .unwrap();

        assert_eq!(outcome, Outcome::Completed);
        // One stop per wheel per pass.
        assert_eq!(left_motor.stop_count(), 2);
        assert_eq!(right_motor.stop_count(), 2);
        // First pass runs 2 left / 4 right cycles before the dark readings.
        assert!(left_motor.run_speeds().len() >= 2);
        assert!(right_motor.run_speeds().len() >= 4);
        assert!(left_motor.run_speeds().iter().all(|&s| s == SQUARING_SPEED));
        // Two backoffs, each ending in a drive stop.
        assert_eq!(drive.stop_count(), 2);
        assert!(drive.speeds().iter().all(|&s| s < 0.0));
    }

    #[test]
    fn test_abort_pre_set_skips_everything() {
        let left_motor = MockMotor::new();
        let right_motor = MockMotor::new();
        let drive = MockDrive::new();
        let abort = AbortToken::new();
        abort.set();

        let outcome = square_on_line(
            &left_motor,
            &right_motor,
            &drive,
            &drive,
            &MockReflectance::constant(60.0),
            &MockReflectance::constant(60.0),
            &cal(),
            &abort,
        )
        .unwrap();

        assert!(outcome.is_aborted());
        assert!(left_motor.run_speeds().is_empty());
        assert!(right_motor.run_speeds().is_empty());
        assert!(drive.commands().is_empty());
    }

    #[test]
    fn test_wheel_loops_observe_abort_within_one_cycle() {
        // Sensors never cross the threshold: only the abort ends the loops.
        let left_motor = MockMotor::new();
        let right_motor = MockMotor::new();
        let left_sensor = MockReflectance::constant(60.0);
        let right_sensor = MockReflectance::constant(60.0);
        let cal = cal();
        let abort = AbortToken::new();

        thread::scope(|s| {
            let left = s.spawn(|| wheel_stop_loop(&left_motor, &left_sensor, &cal, &abort));
            let right = s.spawn(|| wheel_stop_loop(&right_motor, &right_sensor, &cal, &abort));

            thread::sleep(Duration::from_millis(50));
            abort.set();

            left.join().unwrap().unwrap();
            right.join().unwrap().unwrap();
        });

        assert_eq!(left_motor.stop_count(), 1);
        assert_eq!(right_motor.stop_count(), 1);
        assert!(!left_motor.run_speeds().is_empty());
        assert!(!right_motor.run_speeds().is_empty());
    }

    #[test]
    fn test_join_waits_for_both_sub_loops() {
        // The right loop needs many more cycles than the left; a premature
        // join would leave its motor without a stop command.
        struct CountingSensor {
            reads: AtomicUsize,
            dark_after: usize,
        }
        impl ReflectanceSensor for CountingSensor {
            fn set_reflectance_mode(&self) -> Result<()> {
                Ok(())
            }
            fn reflectance(&self) -> Result<f64> {
                let n = self.reads.fetch_add(1, Ordering::Relaxed);
                Ok(if n >= self.dark_after { 5.0 } else { 60.0 })
            }
        }

        let left_motor = MockMotor::new();
        let right_motor = MockMotor::new();
        let cal = cal();
        let abort = AbortToken::new();
        let left_sensor = CountingSensor {
            reads: AtomicUsize::new(0),
            dark_after: 1,
        };
        let right_sensor = CountingSensor {
            reads: AtomicUsize::new(0),
            dark_after: 20,
        };

        thread::scope(|s| {
            let left = s.spawn(|| wheel_stop_loop(&left_motor, &left_sensor, &cal, &abort));
            let right = s.spawn(|| wheel_stop_loop(&right_motor, &right_sensor, &cal, &abort));
            left.join().unwrap().unwrap();
            right.join().unwrap().unwrap();
        });

        assert_eq!(left_motor.run_speeds().len(), 1);
        assert_eq!(right_motor.run_speeds().len(), 20);
        assert_eq!(left_motor.stop_count(), 1);
        assert_eq!(right_motor.stop_count(), 1);
    }

    #[test]
    fn test_sensor_fault_stops_wheel_and_propagates() {
        let motor = MockMotor::new();
        let result = wheel_stop_loop(&motor, &FaultyReflectance, &cal(), &AbortToken::new());
        assert!(matches!(result, Err(Error::Hardware(_))));
        assert_eq!(motor.stop_count(), 1);
    }
}
