//! Mock hardware for testing
//!
//! Every trait in [`traits`](super::traits) has a mock here that records the
//! commands it receives and plays back scripted sensor readings, so control
//! loops can be exercised deterministically without a robot.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    AbortInput, HeadingMode, HeadingSensor, ReflectanceSensor, RotationSensor, SteerableDrive,
    TextDisplay, WheelMotor,
};
use crate::{Error, Result};

/// One recorded drive command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveCommand {
    /// Steering bias in [-100, 100]
    pub steering: f64,
    /// Speed in percent, signed
    pub speed: f64,
}

/// A mock steerable drive that doubles as its own rotation sensor
///
/// Each drive command advances the simulated rotation counter by a fixed
/// number of degrees in the direction of the commanded speed, so
/// distance-terminated loops progress deterministically, one command per
/// cycle.
#[derive(Debug, Default)]
pub struct MockDrive {
    commands: Mutex<Vec<DriveCommand>>,
    stops: AtomicUsize,
    position: Mutex<f64>,
    degrees_per_command: f64,
}

impl MockDrive {
    /// Create a drive whose rotation counter does not move
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a drive advancing `degrees` per drive command (direction-signed)
    pub fn with_advance(degrees: f64) -> Self {
        Self {
            degrees_per_command: degrees,
            ..Default::default()
        }
    }

    /// All drive commands received so far
    pub fn commands(&self) -> Vec<DriveCommand> {
        self.commands.lock().clone()
    }

    /// The speed of every drive command, in order
    pub fn speeds(&self) -> Vec<f64> {
        self.commands.lock().iter().map(|c| c.speed).collect()
    }

    /// Number of stop commands received
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::Relaxed)
    }
}

impl SteerableDrive for MockDrive {
    fn drive(&self, steering: f64, speed_percent: f64) -> Result<()> {
        self.commands.lock().push(DriveCommand {
            steering,
            speed: speed_percent,
        });
        let mut position = self.position.lock();
        if speed_percent > 0.0 {
            *position += self.degrees_per_command;
        } else if speed_percent < 0.0 {
            *position -= self.degrees_per_command;
        }
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl RotationSensor for MockDrive {
    fn reset_position(&self) -> Result<()> {
        *self.position.lock() = 0.0;
        Ok(())
    }

    fn position(&self) -> Result<f64> {
        Ok(*self.position.lock())
    }
}

/// A mock single motor
#[derive(Debug, Default)]
pub struct MockMotor {
    runs: Mutex<Vec<f64>>,
    stops: AtomicUsize,
}

impl MockMotor {
    /// Create a new mock motor
    pub fn new() -> Self {
        Self::default()
    }

    /// Speeds of every run command received
    pub fn run_speeds(&self) -> Vec<f64> {
        self.runs.lock().clone()
    }

    /// Number of stop commands received
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::Relaxed)
    }
}

impl WheelMotor for MockMotor {
    fn run(&self, speed_percent: f64) -> Result<()> {
        self.runs.lock().push(speed_percent);
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// A mock reflectance sensor playing back a scripted reading sequence
///
/// Once the script is down to its last value, that value repeats forever.
/// Reading an empty script is a hardware error, mimicking an unplugged
/// sensor.
#[derive(Debug, Default)]
pub struct MockReflectance {
    readings: Mutex<VecDeque<f64>>,
    mode_sets: AtomicUsize,
}

impl MockReflectance {
    /// Create a sensor that always reads `value`
    pub fn constant(value: f64) -> Self {
        Self::scripted([value])
    }

    /// Create a sensor playing back the given readings in order
    pub fn scripted(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: Mutex::new(readings.into_iter().collect()),
            mode_sets: AtomicUsize::new(0),
        }
    }

    /// How many times the mode was switched to reflectance
    pub fn mode_set_count(&self) -> usize {
        self.mode_sets.load(Ordering::Relaxed)
    }
}

impl ReflectanceSensor for MockReflectance {
    fn set_reflectance_mode(&self) -> Result<()> {
        self.mode_sets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn reflectance(&self) -> Result<f64> {
        let mut readings = self.readings.lock();
        match readings.len() {
            0 => Err(Error::Hardware("reflectance sensor not responding".into())),
            1 => Ok(readings[0]),
            _ => Ok(readings.pop_front().unwrap_or_default()),
        }
    }
}

/// A reflectance sensor that fails on every read
#[derive(Debug, Default)]
pub struct FaultyReflectance;

impl ReflectanceSensor for FaultyReflectance {
    fn set_reflectance_mode(&self) -> Result<()> {
        Ok(())
    }

    fn reflectance(&self) -> Result<f64> {
        Err(Error::Hardware("reflectance sensor not responding".into()))
    }
}

/// A mock heading sensor
///
/// `wait_until_angle_changed_by` returns immediately and records the
/// requested change; `rate` plays back a scripted sequence like
/// [`MockReflectance`].
#[derive(Debug, Default)]
pub struct MockHeading {
    modes: Mutex<Vec<HeadingMode>>,
    waits: Mutex<Vec<f64>>,
    rates: Mutex<VecDeque<f64>>,
}

impl MockHeading {
    /// Create a heading sensor reporting zero rate
    pub fn new() -> Self {
        Self::with_rates([0.0])
    }

    /// Create a heading sensor playing back the given rate readings
    pub fn with_rates(rates: impl IntoIterator<Item = f64>) -> Self {
        Self {
            modes: Mutex::new(Vec::new()),
            waits: Mutex::new(Vec::new()),
            rates: Mutex::new(rates.into_iter().collect()),
        }
    }

    /// Every mode switch received, in order
    pub fn modes(&self) -> Vec<HeadingMode> {
        self.modes.lock().clone()
    }

    /// Every angle-change wait received, in order
    pub fn waits(&self) -> Vec<f64> {
        self.waits.lock().clone()
    }
}

impl HeadingSensor for MockHeading {
    fn set_mode(&self, mode: HeadingMode) -> Result<()> {
        self.modes.lock().push(mode);
        Ok(())
    }

    fn rate(&self) -> Result<f64> {
        let mut rates = self.rates.lock();
        match rates.len() {
            0 => Err(Error::Hardware("heading sensor not responding".into())),
            1 => Ok(rates[0]),
            _ => Ok(rates.pop_front().unwrap_or_default()),
        }
    }

    fn wait_until_angle_changed_by(&self, degrees: f64) -> Result<()> {
        self.waits.lock().push(degrees);
        Ok(())
    }
}

/// A mock abort button
///
/// Clones share the same pressed state, so a test can keep a handle after
/// moving one into an [`AbortWatch`](crate::control::AbortWatch).
#[derive(Debug, Clone, Default)]
pub struct MockButton {
    pressed: Arc<AtomicBool>,
}

impl MockButton {
    /// Create an unpressed button
    pub fn new() -> Self {
        Self::default()
    }

    /// Press the button
    pub fn press(&self) {
        self.pressed.store(true, Ordering::Relaxed);
    }
}

impl AbortInput for MockButton {
    fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }
}

/// A mock display recording every line shown
#[derive(Debug, Default)]
pub struct MockDisplay {
    lines: Mutex<Vec<String>>,
}

impl MockDisplay {
    /// Create a new display
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line shown so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl TextDisplay for MockDisplay {
    fn show_text(&self, text: &str) -> Result<()> {
        self.lines.lock().push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_records_and_advances() {
        let drive = MockDrive::with_advance(5.0);
        drive.drive(10.0, 20.0).unwrap();
        drive.drive(0.0, -20.0).unwrap();
        drive.stop().unwrap();

        assert_eq!(drive.commands().len(), 2);
        assert_eq!(drive.stop_count(), 1);
        assert_eq!(drive.position().unwrap(), 0.0); // +5 then -5

        drive.drive(0.0, 20.0).unwrap();
        assert_eq!(drive.position().unwrap(), 5.0);
        drive.reset_position().unwrap();
        assert_eq!(drive.position().unwrap(), 0.0);
    }

    #[test]
    fn test_scripted_reflectance_repeats_last() {
        let sensor = MockReflectance::scripted([50.0, 60.0]);
        assert_eq!(sensor.reflectance().unwrap(), 50.0);
        assert_eq!(sensor.reflectance().unwrap(), 60.0);
        assert_eq!(sensor.reflectance().unwrap(), 60.0);
    }

    #[test]
    fn test_empty_reflectance_is_hardware_error() {
        let sensor = MockReflectance::scripted([]);
        assert!(sensor.reflectance().is_err());
    }
}
