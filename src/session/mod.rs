// src/session/mod.rs

// Connection tracking and the three delivery drivers.
pub mod state;      // Pure single-slot state machine
pub mod transport;  // Transport traits the platform implements
pub mod http;       // Status page rendering
pub mod wire;       // TCP line / UDP datagram encoders

mod client;
mod datagram;
mod server;

pub use client::ClientLink;
pub use datagram::DatagramLink;
pub use server::HttpServer;
pub use state::{Action, ConnectionState, Event, Role, Session};
pub use transport::{ConnId, DatagramSocket, StreamTransport};

use crate::common::{error::TransportError, hal_traits::Clock, timing};
use core::time::Duration;
use log::{debug, warn};

/// Server startup failures. Each one halts the HTTP subsystem.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Fault {
    /// No connection handle could be allocated for the listener.
    Allocate,
    Bind,
    Listen,
}

impl From<TransportError> for Fault {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::OutOfHandles => Fault::Allocate,
            TransportError::Bind => Fault::Bind,
            _ => Fault::Listen,
        }
    }
}

/// Status reported to the [`Indicator`](crate::common::hal_traits::Indicator).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Signal {
    /// Network up, subsystem running.
    Ready,
    /// A response or telemetry line was acknowledged / a datagram went out.
    Delivered,
    /// A telemetry send or datagram failed.
    SendFailed,
    /// The tracked connection failed asynchronously.
    ConnectionLost,
    /// The sensor did not produce a valid reading.
    SensorFailed,
    /// The status page did not fit its buffer.
    ResponseTooLarge,
    /// The response could not be queued on the connection.
    WriteFailed,
    Fault(Fault),
}

/// LED that carries a signal on the reference board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Led {
    Ok,
    Error,
}

/// `count` on/off cycles of `period` each half.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlinkPattern {
    pub led: Led,
    pub count: u8,
    pub period: Duration,
}

impl BlinkPattern {
    const fn new(led: Led, count: u8, period_ms: u64) -> Self {
        Self {
            led,
            count,
            period: Duration::from_millis(period_ms),
        }
    }
}

impl Signal {
    /// Blink code used by the reference firmware, `None` for a steady LED or no output.
    pub const fn blink_pattern(self) -> Option<BlinkPattern> {
        match self {
            Signal::Ready | Signal::SensorFailed => None,
            Signal::Delivered => Some(BlinkPattern::new(Led::Ok, 1, 20)),
            Signal::SendFailed => Some(BlinkPattern::new(Led::Error, 2, 100)),
            Signal::ConnectionLost => Some(BlinkPattern::new(Led::Error, 3, 150)),
            Signal::WriteFailed => Some(BlinkPattern::new(Led::Error, 4, 100)),
            Signal::ResponseTooLarge => Some(BlinkPattern::new(Led::Error, 5, 100)),
            Signal::Fault(Fault::Allocate) => Some(BlinkPattern::new(Led::Error, 5, 200)),
            Signal::Fault(Fault::Bind) => Some(BlinkPattern::new(Led::Error, 6, 200)),
            Signal::Fault(Fault::Listen) => Some(BlinkPattern::new(Led::Error, 7, 200)),
        }
    }
}

/// Closes a connection the session does not track.
///
/// Handlers are detached before the close; a failed graceful close falls
/// back to `abort`.
pub fn discard_connection<T: StreamTransport>(
    transport: &mut T,
    conn: ConnId,
) -> Result<(), TransportError> {
    transport.unregister(conn);
    if let Err(e) = transport.close(conn) {
        warn!("close of {:?} failed ({}), aborting", conn, e);
        transport.abort(conn);
        return Err(e);
    }
    Ok(())
}

/// Full cleanup of a connection: unregister, close (or abort), and drop the
/// session's reference if it was the tracked one.
pub fn close_connection<T: StreamTransport>(
    transport: &mut T,
    session: &mut Session,
    conn: ConnId,
) -> Result<(), TransportError> {
    let result = discard_connection(transport, conn);
    if session.release(conn) {
        debug!("session released {:?}", conn);
    }
    result
}

/// Retries a write that reports `WouldBlock` until it goes through or
/// `timeout` expires.
pub(crate) fn write_with_timeout<T, C>(
    transport: &mut T,
    clock: &mut C,
    conn: ConnId,
    data: &[u8],
    timeout: Duration,
) -> nb::Result<(), TransportError>
where
    T: StreamTransport,
    C: Clock,
{
    let timeout_us = timing::as_micros_u32(timeout);
    let start = clock.now_us();
    loop {
        match transport.write(conn, data) {
            Err(nb::Error::WouldBlock) => {
                if clock.now_us().wrapping_sub(start) >= timeout_us {
                    return Err(nb::Error::WouldBlock);
                }
                clock.delay_us(100);
            }
            other => return other,
        }
    }
}
