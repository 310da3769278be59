// src/common/hal_traits.rs

use super::types::{Direction, Level};
use crate::session::Signal;
use core::fmt::Debug;

/// Free-running microsecond clock plus blocking delays.
///
/// `now_us` is expected to wrap around like a 32-bit hardware timer; every
/// consumer computes elapsed time with `wrapping_sub`.
pub trait Clock {
    /// Current value of the microsecond counter.
    fn now_us(&self) -> u32;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// The single bidirectional data line of a one-wire sensor.
pub trait SensorLine {
    /// Associated error type for pin access.
    type Error: Debug;

    /// Switches the pin between driving the line and listening to it.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Drives the line. Only meaningful while the direction is `Output`.
    fn write_level(&mut self, level: Level) -> Result<(), Self::Error>;

    /// Samples the line.
    fn read_level(&mut self) -> Result<Level, Self::Error>;
}

/// Digital and analog peripheral inputs (buttons, joystick).
///
/// Both calls are plain synchronous reads; pin and channel setup happens
/// in the platform layer before the orchestrator starts.
pub trait Peripherals {
    /// Samples a digital input pin.
    fn read_digital(&mut self, pin: u8) -> Level;

    /// Converts one ADC channel (12-bit on the reference board).
    fn read_analog(&mut self, channel: u8) -> u16;
}

/// External status indicator (LEDs, buzzer, ...).
pub trait Indicator {
    fn signal(&mut self, signal: Signal);
}

/// Everything the orchestrator needs from the board, bundled on one type.
pub trait Board: SensorLine + Clock + Peripherals + Indicator {}

impl<T> Board for T where T: SensorLine + Clock + Peripherals + Indicator {}
