// src/sensor/bitbang.rs

//! `SensorLine + Clock` over `embedded-hal` 1.0 traits.
//!
//! The data pin must be configured open-drain with a pull-up: driving it high
//! releases the line, so "input" mode is simply a released line that is read.

use crate::common::{
    hal_traits::{Clock, SensorLine},
    types::{Direction, Level},
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Adapter bundling an open-drain pin, a delay provider and a µs counter.
///
/// `now_us` is any closure returning a free-running 32-bit microsecond count
/// (for example the low word of the RP2040 `TIMERAWL` register).
pub struct HalSensorLine<P, D, F> {
    pin: P,
    delay: D,
    now_us: F,
    direction: Direction,
}

impl<P, D, F> HalSensorLine<P, D, F>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    F: Fn() -> u32,
{
    pub fn new(pin: P, delay: D, now_us: F) -> Self {
        Self {
            pin,
            delay,
            now_us,
            direction: Direction::Input,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the wrapped peripherals.
    pub fn release(self) -> (P, D, F) {
        (self.pin, self.delay, self.now_us)
    }
}

impl<P, D, F> SensorLine for HalSensorLine<P, D, F>
where
    P: InputPin + OutputPin,
    D: DelayNs,
    F: Fn() -> u32,
{
    type Error = P::Error;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        if direction == Direction::Input {
            self.pin.set_high()?;
        }
        self.direction = direction;
        Ok(())
    }

    fn write_level(&mut self, level: Level) -> Result<(), Self::Error> {
        match level {
            Level::Low => self.pin.set_low(),
            Level::High => self.pin.set_high(),
        }
    }

    fn read_level(&mut self) -> Result<Level, Self::Error> {
        self.pin.is_high().map(Level::from)
    }
}

impl<P, D, F> Clock for HalSensorLine<P, D, F>
where
    D: DelayNs,
    F: Fn() -> u32,
{
    fn now_us(&self) -> u32 {
        (self.now_us)()
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
