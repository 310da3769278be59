// src/session/client.rs

use super::state::{Action, ConnectionState, Role, Session};
use super::transport::StreamTransport;
use super::{close_connection, discard_connection, Signal};
use crate::common::error::SessionError;
use crate::common::hal_traits::Indicator;
use core::net::SocketAddrV4;
use log::{debug, info, warn};

const RX_BUFFER: usize = 128;

/// Outbound single-connection link with reconnect support.
///
/// The link itself never sleeps: the caller decides when to call
/// [`begin_connect`](Self::begin_connect) again after a failure.
pub struct ClientLink<T> {
    transport: T,
    session: Session,
    remote: SocketAddrV4,
    greeting: Option<&'static str>,
}

impl<T: StreamTransport> ClientLink<T> {
    pub fn new(transport: T, remote: SocketAddrV4) -> Self {
        Self {
            transport,
            session: Session::new(Role::Client),
            remote,
            greeting: None,
        }
    }

    /// Line written once every time a connection comes up.
    pub fn with_greeting(mut self, greeting: Option<&'static str>) -> Self {
        self.greeting = greeting;
        self
    }

    pub fn remote(&self) -> SocketAddrV4 {
        self.remote
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Starts one connection attempt. Only valid while Idle.
    pub fn begin_connect(&mut self) -> Result<(), SessionError> {
        if !self.session.is_idle() {
            return Err(SessionError::Busy);
        }
        info!("connecting to {}", self.remote);
        let conn = self.transport.connect(self.remote)?;
        self.session.begin_connect(conn)
    }

    /// Drops an attempt that is still in the Connecting state.
    ///
    /// # Returns
    ///
    /// `true` if an attempt was pending and has been torn down.
    pub fn abandon_pending(&mut self) -> bool {
        match (self.session.state(), self.session.connection()) {
            (ConnectionState::Connecting, Some(conn)) => {
                warn!("connect to {} still pending, abandoning", self.remote);
                let _ = close_connection(&mut self.transport, &mut self.session, conn);
                true
            }
            _ => false,
        }
    }

    /// Writes one message on the active connection.
    ///
    /// No queue: `WouldBlock` drops the message. A hard write error tears the
    /// connection down and the session returns to Idle.
    pub fn send(&mut self, message: &str) -> Result<(), SessionError> {
        let conn = match self.session.connection() {
            Some(conn) if self.session.is_active() => conn,
            _ => return Err(SessionError::NotActive),
        };
        match self.transport.write(conn, message.as_bytes()) {
            Ok(()) => {
                debug!("sent {} bytes", message.len());
                Ok(())
            }
            Err(nb::Error::WouldBlock) => Err(SessionError::WouldBlock),
            Err(nb::Error::Other(e)) => {
                warn!("write to {} failed: {}", self.remote, e);
                let _ = close_connection(&mut self.transport, &mut self.session, conn);
                Err(e.into())
            }
        }
    }

    /// Drains every pending transport event.
    ///
    /// # Returns
    ///
    /// Number of events handled.
    pub fn service<B: Indicator>(&mut self, board: &mut B) -> usize {
        let mut buf = [0u8; RX_BUFFER];
        let mut handled = 0;
        while let Some(event) = self.transport.poll(&mut buf) {
            handled += 1;
            let action = self.session.handle_event(&event);
            debug!("link {:?} -> {:?}", event.conn(), action);
            match action {
                Action::None | Action::Respond(_) => {}
                Action::Reject(conn) => {
                    let _ = discard_connection(&mut self.transport, conn);
                }
                Action::Greet(conn) => {
                    info!("connected to {} ({:?})", self.remote, conn);
                    board.signal(Signal::Ready);
                    if let Some(greeting) = self.greeting {
                        if let Err(e) = self.send(greeting) {
                            warn!("greeting not sent: {}", e);
                        }
                    }
                }
                Action::Delivered(_) => board.signal(Signal::Delivered),
                Action::Close(conn) => {
                    info!("connection to {} closed by peer", self.remote);
                    let _ = close_connection(&mut self.transport, &mut self.session, conn);
                    board.signal(Signal::ConnectionLost);
                }
                Action::Release(conn) => {
                    warn!("connection {:?} to {} failed", conn, self.remote);
                    self.transport.unregister(conn);
                    board.signal(Signal::ConnectionLost);
                }
            }
        }
        handled
    }
}
