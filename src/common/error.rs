// src/common/error.rs

use core::fmt::Debug;

/// Which half of a timed wait ran out of time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TimeoutKind {
    /// The line never reached the requested level.
    #[error("timed out waiting for the line to reach the target level")]
    TargetLevel,

    /// The line reached the level but stayed there longer than allowed.
    #[error("timed out waiting for the line to leave the target level")]
    LevelDuration,
}

/// Failure of a single timed wait on the sensor line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum WaitError<E = ()>
where
    E: Debug,
{
    #[error("{0}")]
    Timeout(TimeoutKind),

    /// Underlying pin error from the HAL implementation.
    #[error("pin error: {0:?}")]
    Pin(E),
}

/// Why a sensor decode attempt produced no reading.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError<E = ()>
where
    E: Debug,
{
    /// The sensor did not answer the start signal (low/high acknowledgment).
    #[error("sensor did not acknowledge start signal: {0}")]
    Handshake(TimeoutKind),

    /// A data bit pulse never arrived or never ended.
    #[error("bit {bit} lost: {kind}")]
    Bit { bit: u8, kind: TimeoutKind },

    /// The frame arrived complete but its checksum byte does not match.
    #[error("checksum mismatch: frame says {received:#04x}, payload sums to {computed:#04x}")]
    Checksum { received: u8, computed: u8 },

    #[error("pin error: {0:?}")]
    Pin(E),
}

impl<E: Debug> DecodeError<E> {
    /// Attach the failing phase to a wait error coming from the handshake.
    pub(crate) fn handshake(err: WaitError<E>) -> Self {
        match err {
            WaitError::Timeout(kind) => DecodeError::Handshake(kind),
            WaitError::Pin(e) => DecodeError::Pin(e),
        }
    }

    /// Attach the bit index to a wait error coming from the payload phase.
    pub(crate) fn bit(bit: u8, err: WaitError<E>) -> Self {
        match err {
            WaitError::Timeout(kind) => DecodeError::Bit { bit, kind },
            WaitError::Pin(e) => DecodeError::Pin(e),
        }
    }

    /// True for the timing failures (handshake or bit), false for checksum and pin errors.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DecodeError::Handshake(_) | DecodeError::Bit { .. })
    }
}

/// Errors reported by a network transport.
///
/// Values mirror the failure points of a raw TCP/UDP stack: handle
/// allocation, bind, listen, connect, write, and asynchronous connection loss.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("could not allocate a connection handle")]
    OutOfHandles,

    #[error("bind failed")]
    Bind,

    #[error("listen failed")]
    Listen,

    #[error("connect failed")]
    Connect,

    #[error("write failed")]
    Write,

    #[error("graceful close failed")]
    Close,

    #[error("connection reset by peer")]
    Reset,

    #[error("connection aborted")]
    Aborted,

    /// Stack specific error code that has no better mapping.
    #[error("transport error code {0}")]
    Other(i8),
}

/// Errors returned by the session drivers to their caller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// The operation needs an Active session.
    #[error("session is not active")]
    NotActive,

    /// A connect was requested while a connection is already tracked.
    #[error("session already owns a connection")]
    Busy,

    /// The transport cannot accept more data right now; nothing was queued.
    #[error("transport busy, message dropped")]
    WouldBlock,

    /// The outgoing message did not fit its fixed-capacity buffer.
    #[error("message does not fit its buffer")]
    Format,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure to render the HTTP status page.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum HttpError {
    #[error("response body exceeds {capacity} bytes")]
    BodyTooLarge { capacity: usize },

    #[error("response exceeds {capacity} bytes")]
    ResponseTooLarge { capacity: usize },
}

// Allow mapping a raw pin error straight into the wait error
impl<E: Debug> From<E> for WaitError<E> {
    fn from(e: E) -> Self {
        WaitError::Pin(e)
    }
}
