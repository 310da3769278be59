// src/session/state.rs

use super::transport::ConnId;
use crate::common::error::{SessionError, TransportError};
use super::http::is_get_request;

/// Which side of the connection this device plays.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    /// Inbound, single slot: one client at a time, every other attempt is refused.
    Server,
    /// Outbound, single slot, reconnects after failures.
    Client,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Active,
    Closing,
}

/// Something the transport reported.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Event<'a> {
    /// A new inbound connection.
    Accepted(ConnId),
    /// An outbound connection completed its handshake.
    Connected(ConnId),
    DataReceived { conn: ConnId, data: &'a [u8] },
    /// The peer closed its side.
    RemoteClosed(ConnId),
    /// The peer acknowledged `len` bytes.
    SendAcknowledged { conn: ConnId, len: usize },
    /// The connection failed; the transport has already freed the handle.
    Errored { conn: ConnId, error: TransportError },
}

impl Event<'_> {
    pub const fn conn(&self) -> ConnId {
        match *self {
            Event::Accepted(conn)
            | Event::Connected(conn)
            | Event::RemoteClosed(conn)
            | Event::DataReceived { conn, .. }
            | Event::SendAcknowledged { conn, .. }
            | Event::Errored { conn, .. } => conn,
        }
    }
}

/// What the driver has to do with the transport after an event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    None,
    /// Close a connection the session does not track, leaving the session untouched.
    Reject(ConnId),
    /// Write the status response.
    Respond(ConnId),
    /// Run the full cleanup on the tracked connection.
    Close(ConnId),
    /// Unregister handlers only; the handle is already gone.
    Release(ConnId),
    /// Outbound connection is up; send the greeting, if any.
    Greet(ConnId),
    /// A write was acknowledged. The session is `Closing` if the connection should go.
    Delivered(ConnId),
}

/// Single-slot connection tracker.
///
/// Pure state: [`handle_event`](Session::handle_event) never touches the
/// transport, the drivers apply the returned [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: Role,
    state: ConnectionState,
    conn: Option<ConnId>,
}

impl Session {
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            state: ConnectionState::Idle,
            conn: None,
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// The tracked connection, in any non-idle state.
    pub const fn connection(&self) -> Option<ConnId> {
        self.conn
    }

    pub fn is_idle(&self) -> bool {
        self.state == ConnectionState::Idle
    }

    pub fn is_active(&self) -> bool {
        self.state == ConnectionState::Active
    }

    fn tracks(&self, conn: ConnId) -> bool {
        self.conn == Some(conn)
    }

    /// Records an outbound attempt started on `conn` (Idle -> Connecting).
    pub fn begin_connect(&mut self, conn: ConnId) -> Result<(), SessionError> {
        if self.role != Role::Client || self.conn.is_some() {
            return Err(SessionError::Busy);
        }
        self.conn = Some(conn);
        self.state = ConnectionState::Connecting;
        Ok(())
    }

    /// Forgets `conn` if it is the tracked connection.
    ///
    /// # Returns
    ///
    /// `true` if the session was tracking `conn` and is now Idle.
    pub fn release(&mut self, conn: ConnId) -> bool {
        if !self.tracks(conn) {
            return false;
        }
        self.conn = None;
        self.state = ConnectionState::Idle;
        true
    }

    /// Transition function.
    pub fn handle_event(&mut self, event: &Event<'_>) -> Action {
        let conn = event.conn();

        // Failures first: identical for both roles.
        if let Event::Errored { .. } = event {
            self.release(conn);
            return Action::Release(conn);
        }

        if !self.tracks(conn) {
            return match (self.role, event) {
                (Role::Server, Event::Accepted(_)) if self.conn.is_none() => {
                    self.conn = Some(conn);
                    self.state = ConnectionState::Active;
                    Action::None
                }
                // Second inbound attempt, stale outbound attempt, or data for a
                // connection we already let go of.
                _ => Action::Reject(conn),
            };
        }

        match (self.role, event) {
            (Role::Client, Event::Connected(_)) if self.state == ConnectionState::Connecting => {
                self.state = ConnectionState::Active;
                Action::Greet(conn)
            }
            (Role::Server, Event::DataReceived { data, .. }) if self.state == ConnectionState::Active => {
                if is_get_request(data) {
                    Action::Respond(conn)
                } else {
                    self.state = ConnectionState::Closing;
                    Action::Close(conn)
                }
            }
            (Role::Server, Event::SendAcknowledged { .. }) => {
                self.state = ConnectionState::Closing;
                Action::Delivered(conn)
            }
            (Role::Client, Event::SendAcknowledged { .. }) if self.state == ConnectionState::Active => {
                Action::Delivered(conn)
            }
            (_, Event::RemoteClosed(_)) => {
                self.state = ConnectionState::Closing;
                Action::Close(conn)
            }
            _ => Action::None,
        }
    }
}
