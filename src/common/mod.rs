// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod checksum;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From checksum.rs
pub use checksum::{frame_checksum, verify_frame_checksum};

// From error.rs
pub use error::{DecodeError, HttpError, SessionError, TimeoutKind, TransportError, WaitError};

// From frame.rs
pub use frame::{Encoding, FrameAssembler, RawSensorFrame};

// From hal_traits.rs
pub use hal_traits::{Board, Clock, Indicator, Peripherals, SensorLine};

// From types.rs
pub use types::{Direction, Level, SensorReading};

// Protocol constants stay behind `common::timing::*`.
