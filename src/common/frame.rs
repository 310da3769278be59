// src/common/frame.rs

use super::checksum::verify_frame_checksum;
use super::error::DecodeError;
use super::types::SensorReading;
use core::fmt::Debug;

/// How the four payload bytes map to physical values.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Encoding {
    /// Integer bytes only; the fraction bytes are ignored (DHT11 clones
    /// that always send zero there).
    IntegerOnly,
    /// `integer + fraction / 10` for both humidity and temperature.
    IntegerFraction,
    /// 16-bit big-endian tenths; bit 7 of the temperature high byte is the sign (DHT22/AM2302).
    Tenths,
}

/// The 5 raw bytes clocked out by the sensor:
/// humidity integer, humidity fraction, temperature integer, temperature fraction, checksum.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct RawSensorFrame([u8; 5]);

impl RawSensorFrame {
    pub const LEN: usize = 5;

    pub const fn from_bytes(bytes: [u8; 5]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 5] {
        &self.0
    }

    #[inline]
    pub const fn humidity_integer(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn humidity_fraction(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn temperature_integer(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn temperature_fraction(&self) -> u8 {
        self.0[3]
    }

    #[inline]
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Rejects the frame wholesale if the checksum byte does not match.
    pub fn validate<E: Debug>(&self) -> Result<(), DecodeError<E>> {
        verify_frame_checksum(&self.0)
            .map_err(|(received, computed)| DecodeError::Checksum { received, computed })
    }

    /// Validates the checksum and converts the payload into a reading.
    pub fn decode<E: Debug>(&self, encoding: Encoding) -> Result<SensorReading, DecodeError<E>> {
        self.validate()?;

        let (temperature, humidity) = match encoding {
            Encoding::IntegerOnly => (
                f32::from(self.temperature_integer()),
                f32::from(self.humidity_integer()),
            ),
            Encoding::IntegerFraction => (
                f32::from(self.temperature_integer()) + f32::from(self.temperature_fraction()) / 10.0,
                f32::from(self.humidity_integer()) + f32::from(self.humidity_fraction()) / 10.0,
            ),
            Encoding::Tenths => {
                let raw_h = u16::from_be_bytes([self.humidity_integer(), self.humidity_fraction()]);
                let raw_t = u16::from_be_bytes([
                    self.temperature_integer() & 0x7F,
                    self.temperature_fraction(),
                ]);
                let mut temperature = f32::from(raw_t) / 10.0;
                if self.temperature_integer() & 0x80 != 0 {
                    temperature = -temperature;
                }
                (temperature, f32::from(raw_h) / 10.0)
            }
        };

        Ok(SensorReading::new(temperature, humidity))
    }
}

/// Collects bits MSB-first, in transmission order, into a frame.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    bytes: [u8; 5],
    bits: u8,
}

impl FrameAssembler {
    pub const fn new() -> Self {
        Self { bytes: [0; 5], bits: 0 }
    }

    /// Appends the next received bit. Bits beyond the 40th are ignored.
    pub fn push_bit(&mut self, one: bool) {
        if self.is_complete() {
            return;
        }
        let idx = usize::from(self.bits / 8);
        self.bytes[idx] = (self.bytes[idx] << 1) | u8::from(one);
        self.bits += 1;
    }

    pub const fn bit_count(&self) -> u8 {
        self.bits
    }

    pub const fn is_complete(&self) -> bool {
        self.bits as usize >= RawSensorFrame::LEN * 8
    }

    pub const fn finish(self) -> RawSensorFrame {
        RawSensorFrame(self.bytes)
    }
}
