// src/session/transport.rs

use super::state::Event;
use crate::common::error::TransportError;
use core::net::SocketAddrV4;

/// Opaque handle of one transport connection.
///
/// The transport owns the connection; the session only ever stores this token.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ConnId(u16);

impl ConnId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Connection-oriented transport with polled event delivery (TCP).
///
/// Platform glue wraps the network stack's callbacks into [`Event`]s and
/// hands them out one at a time from [`poll`](StreamTransport::poll).
pub trait StreamTransport {
    /// Starts accepting inbound connections on `port`.
    fn listen(&mut self, port: u16, backlog: u8) -> Result<(), TransportError>;

    /// Starts an outbound connection. Completion arrives later as
    /// [`Event::Connected`] or [`Event::Errored`].
    fn connect(&mut self, remote: SocketAddrV4) -> Result<ConnId, TransportError>;

    /// Queues `data` for transmission and pushes it out.
    ///
    /// Either the whole slice is accepted or nothing is. `WouldBlock` means the
    /// send buffer is full right now.
    fn write(&mut self, conn: ConnId, data: &[u8]) -> nb::Result<(), TransportError>;

    /// Detaches every callback of `conn`; no event for it is produced afterwards.
    fn unregister(&mut self, conn: ConnId);

    /// Graceful close.
    fn close(&mut self, conn: ConnId) -> Result<(), TransportError>;

    /// Hard reset. Always succeeds and frees the handle.
    fn abort(&mut self, conn: ConnId);

    /// Returns the next pending event, if any. Received payload is copied into `buf`.
    fn poll<'b>(&mut self, buf: &'b mut [u8]) -> Option<Event<'b>>;
}

/// Connectionless transport (UDP).
pub trait DatagramSocket {
    /// Sends one datagram. No acknowledgment, no retry.
    fn send_to(&mut self, remote: SocketAddrV4, data: &[u8]) -> nb::Result<(), TransportError>;
}
