// src/common/types.rs

use core::ops::Not;

/// Logic level of a digital line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Pin direction of the sensor data line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

/// One humidity/temperature sample.
///
/// Produced fresh by every decode attempt. An invalid reading always carries
/// `0.0` in both fields, never partially decoded data.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity, percent.
    pub humidity: f32,
    pub valid: bool,
}

impl SensorReading {
    /// Value shown by the status page when the sensor could not be read.
    pub const FAILURE_SENTINEL: f32 = -99.0;

    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self {
            temperature,
            humidity,
            valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            temperature: 0.0,
            humidity: 0.0,
            valid: false,
        }
    }

    /// Temperature, or the failure sentinel when the reading is invalid.
    pub fn temperature_or_sentinel(&self) -> f32 {
        if self.valid {
            self.temperature
        } else {
            Self::FAILURE_SENTINEL
        }
    }

    /// Humidity, or the failure sentinel when the reading is invalid.
    pub fn humidity_or_sentinel(&self) -> f32 {
        if self.valid {
            self.humidity
        } else {
            Self::FAILURE_SENTINEL
        }
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::invalid()
    }
}
