// src/common/timing.rs

use core::time::Duration;

// Nominal values from the DHT11/DHT22 datasheets. Timeouts are deliberately
// generous compared to the nominal pulse widths: the polling loop adds a few
// microseconds of jitter per sample on a 125 MHz Cortex-M0+.

// === Host Start Signal ===

/// Host holds the line low for at least 18 ms to wake a DHT11.
pub const START_LOW_MIN: Duration = Duration::from_millis(18);
/// Start low actually driven by default (margin over `START_LOW_MIN`).
pub const START_LOW: Duration = Duration::from_millis(20);
/// DHT22 only needs a ~1 ms start pulse.
pub const START_LOW_DHT22: Duration = Duration::from_millis(1);
/// Host releases the line high for ~40 µs before switching to input.
pub const START_HIGH: Duration = Duration::from_micros(40);

// === Sensor Acknowledgment ===

/// Nominal sensor response: 80 µs low followed by 80 µs high.
pub const RESPONSE_PULSE: Duration = Duration::from_micros(80);
/// Timeout for each acknowledgment phase.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_micros(120);

// === Data Bits ===

/// Number of bits in a frame (5 bytes).
pub const FRAME_BITS: u8 = 40;
/// Nominal low pulse that precedes every bit.
pub const BIT_START_PULSE: Duration = Duration::from_micros(50);
/// Timeout for the bit-start low pulse.
pub const BIT_START_TIMEOUT: Duration = Duration::from_micros(70);
/// Timeout for the bit-value high pulse (nominal 26-28 µs for 0, 70 µs for 1).
pub const BIT_HIGH_TIMEOUT: Duration = Duration::from_micros(100);
/// A high pulse longer than this decodes as a `1`.
pub const BIT_ONE_THRESHOLD: Duration = Duration::from_micros(45);

// Values used by the line-protocol firmware decoder (looser timeouts,
// 50 µs threshold). Both thresholds sit between the nominal 0 and 1 widths.

/// Single timeout used for every phase by the looser decoder.
pub const RELAXED_TIMEOUT: Duration = Duration::from_micros(200);
/// Bit threshold used by the looser decoder.
pub const RELAXED_BIT_ONE_THRESHOLD: Duration = Duration::from_micros(50);

// === Sensor Cadence ===

/// The sensor must not be polled more often than this (settling time).
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);

// === Network Cadence ===

/// Wait between outbound connection attempts.
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(3);
/// Pause between telemetry lines on the TCP uplink.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(2);
/// Pause between UDP datagrams.
pub const DATAGRAM_INTERVAL: Duration = Duration::from_millis(100);
/// Granularity at which sleeps service pending transport events.
pub const POLL_SLICE: Duration = Duration::from_millis(10);
/// Upper bound for pushing the HTTP response into the transport.
pub const RESPONSE_WRITE_TIMEOUT: Duration = Duration::from_millis(50);

/// Saturating conversion used by the µs-based clock API.
#[inline]
pub const fn as_micros_u32(d: Duration) -> u32 {
    let us = d.as_micros();
    if us > u32::MAX as u128 {
        u32::MAX
    } else {
        us as u32
    }
}

/// Saturating conversion used by the ms-based delay API.
#[inline]
pub const fn as_millis_u32(d: Duration) -> u32 {
    let ms = d.as_millis();
    if ms > u32::MAX as u128 {
        u32::MAX
    } else {
        ms as u32
    }
}
