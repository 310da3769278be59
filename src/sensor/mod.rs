// src/sensor/mod.rs

// Bit-level access to the DHT data line.
pub mod waiter;   // Timed level waits on the line
pub mod decoder;  // Start signal, 40-bit frame, checksum, encoding

// embedded-hal pin/delay adapter (feature-gated)
#[cfg(feature = "impl-bitbang")]
pub mod bitbang;

// --- Public Re-exports ---
pub use decoder::{DecoderConfig, SensorDecoder};
pub use waiter::wait_for_level;

#[cfg(feature = "impl-bitbang")]
pub use bitbang::HalSensorLine;
