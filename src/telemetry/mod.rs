// src/telemetry/mod.rs

// Sampling, record composition and the control loops.
pub mod acquisition;
pub mod orchestrator;
pub mod record;

// Re-export the public types
pub use acquisition::Acquisition;
pub use orchestrator::Orchestrator;
pub use record::{PeripheralSnapshot, TelemetryRecord};
