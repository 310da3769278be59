// src/telemetry/acquisition.rs

use super::record::{PeripheralSnapshot, TelemetryRecord};
use crate::common::{
    hal_traits::{Clock, SensorLine},
    timing,
    types::SensorReading,
};
use crate::sensor::SensorDecoder;
use core::time::Duration;

/// Rate-limited sensor sampling with a last-known-good fallback.
#[derive(Debug, Clone)]
pub struct Acquisition {
    decoder: SensorDecoder,
    min_interval_us: u32,
    last_attempt: Option<u32>,
    latest: SensorReading,
    last_good: Option<SensorReading>,
}

impl Acquisition {
    pub fn new(decoder: SensorDecoder, min_interval: Duration) -> Self {
        Self {
            decoder,
            min_interval_us: timing::as_micros_u32(min_interval),
            last_attempt: None,
            latest: SensorReading::invalid(),
            last_good: None,
        }
    }

    /// Runs a decode unless the previous attempt is more recent than the
    /// minimum interval.
    ///
    /// # Returns
    ///
    /// The fresh reading, or `None` when the sensor was not polled.
    pub fn sample<IF>(&mut self, iface: &mut IF) -> Option<SensorReading>
    where
        IF: SensorLine + Clock,
    {
        let now = iface.now_us();
        if let Some(last) = self.last_attempt {
            if now.wrapping_sub(last) < self.min_interval_us {
                return None;
            }
        }
        self.last_attempt = Some(now);

        let reading = self.decoder.read(iface);
        self.latest = reading;
        if reading.valid {
            self.last_good = Some(reading);
        }
        Some(reading)
    }

    /// Result of the most recent decode attempt (invalid before the first one).
    pub fn latest(&self) -> SensorReading {
        self.latest
    }

    /// Most recent valid reading, if any decode ever succeeded.
    pub fn last_good(&self) -> Option<SensorReading> {
        self.last_good
    }

    /// Builds the pushed record: the last good reading (zeros before the first
    /// one), flagged stale when the latest attempt failed.
    pub fn record(&self, peripherals: PeripheralSnapshot) -> TelemetryRecord {
        TelemetryRecord {
            peripherals,
            reading: self.last_good.unwrap_or_default(),
            stale: !self.latest.valid,
        }
    }
}
