// src/sensor/decoder.rs

use super::waiter::wait_for_level;
use crate::common::{
    error::DecodeError,
    frame::{Encoding, FrameAssembler, RawSensorFrame},
    hal_traits::{Clock, SensorLine},
    timing,
    types::{Direction, Level, SensorReading},
};
use core::time::Duration;
use log::{debug, trace};

/// Every timing constant of one decoder variant plus the payload encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Host start pulse, line driven low.
    pub start_low: Duration,
    /// Line driven high before releasing it to the sensor.
    pub start_high: Duration,
    /// Bound for each of the two acknowledgment phases.
    pub response_timeout: Duration,
    /// Bound for the low pulse preceding every bit.
    pub bit_start_timeout: Duration,
    /// Bound for the high pulse carrying the bit value.
    pub bit_high_timeout: Duration,
    /// High pulses strictly longer than this decode as `1`.
    pub one_threshold: Duration,
    pub encoding: Encoding,
}

impl DecoderConfig {
    /// DHT11 with integer-only payload, as read by the HTTP status firmware.
    pub const DHT11: Self = Self {
        start_low: timing::START_LOW,
        start_high: timing::START_HIGH,
        response_timeout: timing::RESPONSE_TIMEOUT,
        bit_start_timeout: timing::BIT_START_TIMEOUT,
        bit_high_timeout: timing::BIT_HIGH_TIMEOUT,
        one_threshold: timing::BIT_ONE_THRESHOLD,
        encoding: Encoding::IntegerOnly,
    };

    /// DHT11 read with loose 200 µs bounds and the fraction bytes applied.
    pub const DHT11_FRACTIONAL: Self = Self {
        start_low: timing::START_LOW,
        start_high: timing::START_HIGH,
        response_timeout: timing::RELAXED_TIMEOUT,
        bit_start_timeout: timing::RELAXED_TIMEOUT,
        bit_high_timeout: timing::RELAXED_TIMEOUT,
        one_threshold: timing::RELAXED_BIT_ONE_THRESHOLD,
        encoding: Encoding::IntegerFraction,
    };

    /// DHT22 / AM2302: short start pulse, 16-bit tenths payload.
    pub const DHT22: Self = Self {
        start_low: timing::START_LOW_DHT22,
        encoding: Encoding::Tenths,
        ..Self::DHT11
    };

    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub const fn with_one_threshold(mut self, threshold: Duration) -> Self {
        self.one_threshold = threshold;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::DHT11
    }
}

/// Bit-banged reader for the DHT family one-wire protocol.
///
/// The decoder holds only its configuration; every call runs a complete
/// start / acknowledge / 40-bit / checksum cycle and nothing carries over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SensorDecoder {
    config: DecoderConfig,
}

impl SensorDecoder {
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Performs one acquisition. Any failure yields [`SensorReading::invalid`].
    pub fn read<IF>(&self, iface: &mut IF) -> SensorReading
    where
        IF: SensorLine + Clock,
    {
        match self.try_read(iface) {
            Ok(reading) => reading,
            Err(e) => {
                debug!("sensor read failed: {}", e);
                SensorReading::invalid()
            }
        }
    }

    /// Performs one acquisition and reports why it failed, if it did.
    pub fn try_read<IF>(&self, iface: &mut IF) -> Result<SensorReading, DecodeError<IF::Error>>
    where
        IF: SensorLine + Clock,
    {
        self.send_start_signal(iface)?;
        let frame = self.read_frame_masked(iface)?;
        trace!("sensor frame {:02x?}", frame.as_bytes());
        frame.decode(self.config.encoding)
    }

    /// Host start pulse, then release the line to the sensor.
    fn send_start_signal<IF>(&self, iface: &mut IF) -> Result<(), DecodeError<IF::Error>>
    where
        IF: SensorLine + Clock,
    {
        iface.set_direction(Direction::Output).map_err(DecodeError::Pin)?;
        iface.write_level(Level::Low).map_err(DecodeError::Pin)?;
        iface.delay_ms(timing::as_millis_u32(self.config.start_low));
        iface.write_level(Level::High).map_err(DecodeError::Pin)?;
        iface.delay_us(timing::as_micros_u32(self.config.start_high));
        iface.set_direction(Direction::Input).map_err(DecodeError::Pin)
    }

    #[cfg(feature = "critical-section")]
    fn read_frame_masked<IF>(&self, iface: &mut IF) -> Result<RawSensorFrame, DecodeError<IF::Error>>
    where
        IF: SensorLine + Clock,
    {
        critical_section::with(|_| self.read_frame(iface))
    }

    #[cfg(not(feature = "critical-section"))]
    fn read_frame_masked<IF>(&self, iface: &mut IF) -> Result<RawSensorFrame, DecodeError<IF::Error>>
    where
        IF: SensorLine + Clock,
    {
        self.read_frame(iface)
    }

    /// Acknowledgment plus the 40 data bits.
    fn read_frame<IF>(&self, iface: &mut IF) -> Result<RawSensorFrame, DecodeError<IF::Error>>
    where
        IF: SensorLine + Clock,
    {
        let response = timing::as_micros_u32(self.config.response_timeout);
        wait_for_level(iface, Level::Low, response).map_err(DecodeError::handshake)?;
        wait_for_level(iface, Level::High, response).map_err(DecodeError::handshake)?;

        let bit_start = timing::as_micros_u32(self.config.bit_start_timeout);
        let bit_high = timing::as_micros_u32(self.config.bit_high_timeout);
        let threshold = timing::as_micros_u32(self.config.one_threshold);

        let mut assembler = FrameAssembler::new();
        for bit in 0..timing::FRAME_BITS {
            wait_for_level(iface, Level::Low, bit_start).map_err(|e| DecodeError::bit(bit, e))?;
            let held = wait_for_level(iface, Level::High, bit_high).map_err(|e| DecodeError::bit(bit, e))?;
            assembler.push_bit(held > threshold);
        }
        Ok(assembler.finish())
    }
}
