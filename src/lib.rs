// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod config;
pub mod sensor;
pub mod session;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod mock;

// Re-export key types for convenience
pub use common::{DecodeError, SensorReading, TransportError};
pub use config::Config;
pub use sensor::{DecoderConfig, SensorDecoder};
pub use session::{ConnId, Session, Signal};
pub use telemetry::Orchestrator;
