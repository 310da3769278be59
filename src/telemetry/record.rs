// src/telemetry/record.rs

use crate::common::{hal_traits::Peripherals, types::SensorReading};
use crate::config::PinMap;

/// Buttons and joystick, sampled together.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PeripheralSnapshot {
    pub joystick_x: u16,
    pub joystick_y: u16,
    pub joystick_pressed: bool,
    pub button_a: bool,
    pub button_b: bool,
}

impl PeripheralSnapshot {
    /// Buttons are wired with pull-ups: a low line means pressed.
    pub fn read<P: Peripherals>(periph: &mut P, pins: &PinMap) -> Self {
        Self {
            joystick_pressed: periph.read_digital(pins.joystick_button).is_low(),
            button_a: periph.read_digital(pins.button_a).is_low(),
            button_b: periph.read_digital(pins.button_b).is_low(),
            joystick_x: periph.read_analog(pins.joystick_x),
            joystick_y: periph.read_analog(pins.joystick_y),
        }
    }
}

/// One telemetry message, built fresh for every send.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub peripherals: PeripheralSnapshot,
    pub reading: SensorReading,
    /// The latest decode failed; `reading` is older than this record.
    pub stale: bool,
}
