// src/config.rs

//! Board wiring and link configuration.
//!
//! Everything here is plain data with `const fn` constructors so a firmware
//! can build its configuration in a `static`. Defaults reproduce the
//! reference board (BitDogLab, RP2040 + CYW43).

use crate::common::timing;
use crate::sensor::DecoderConfig;
use core::net::{Ipv4Addr, SocketAddrV4};
use core::time::Duration;

/// GPIO pins and ADC channels of the peripherals.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PinMap {
    /// Data line of the DHT sensor.
    pub sensor: u8,
    /// Joystick push button (active low, pull-up).
    pub joystick_button: u8,
    /// Button A (active low, pull-up). Also the button shown on the status page.
    pub button_a: u8,
    /// Button B (active low, pull-up).
    pub button_b: u8,
    /// ADC channel of the joystick X axis.
    pub joystick_x: u8,
    /// ADC channel of the joystick Y axis.
    pub joystick_y: u8,
}

impl PinMap {
    pub const fn reference_board() -> Self {
        Self {
            sensor: 16,
            joystick_button: 22,
            button_a: 5,
            button_b: 6,
            // GP27 -> ADC1, GP26 -> ADC0
            joystick_x: 1,
            joystick_y: 0,
        }
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::reference_board()
    }
}

/// Addresses and pacing of the network link.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LinkConfig {
    /// Port of the embedded HTTP server.
    pub listen_port: u16,
    /// Collector for the TCP line stream and UDP datagrams.
    pub remote: SocketAddrV4,
    /// Wait between outbound connection attempts.
    pub reconnect_backoff: Duration,
    /// Pause between TCP telemetry lines.
    pub report_interval: Duration,
    /// Pause between UDP datagrams.
    pub datagram_interval: Duration,
    /// Line written once right after an outbound connection is established.
    pub greeting: Option<&'static str>,
}

impl LinkConfig {
    pub const DEFAULT_LISTEN_PORT: u16 = 8081;
    pub const DEFAULT_COLLECTOR_PORT: u16 = 8082;

    pub const fn new(remote: SocketAddrV4) -> Self {
        Self {
            listen_port: Self::DEFAULT_LISTEN_PORT,
            remote,
            reconnect_backoff: timing::RECONNECT_BACKOFF,
            report_interval: timing::REPORT_INTERVAL,
            datagram_interval: timing::DATAGRAM_INTERVAL,
            greeting: Some("HELLO\n"),
        }
    }

    pub const fn with_listen_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }

    pub const fn with_greeting(mut self, greeting: Option<&'static str>) -> Self {
        self.greeting = greeting;
        self
    }
}

impl Default for LinkConfig {
    /// The collector address is left unspecified; firmware must set it.
    fn default() -> Self {
        Self::new(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, Self::DEFAULT_COLLECTOR_PORT))
    }
}

/// Complete runtime configuration of the orchestrator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    pub pins: PinMap,
    pub decoder: DecoderConfig,
    pub link: LinkConfig,
    /// Minimum spacing between two decode attempts.
    pub min_sample_interval: Duration,
}

impl Config {
    pub const fn new(pins: PinMap, decoder: DecoderConfig, link: LinkConfig) -> Self {
        Self {
            pins,
            decoder,
            link,
            min_sample_interval: timing::MIN_SAMPLE_INTERVAL,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PinMap::default(), DecoderConfig::default(), LinkConfig::default())
    }
}
