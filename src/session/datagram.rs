// src/session/datagram.rs

use super::transport::DatagramSocket;
use crate::common::error::SessionError;
use core::net::SocketAddrV4;
use log::{trace, warn};

/// Fire-and-forget datagram sender. No connection, no acknowledgment, no retry.
pub struct DatagramLink<U> {
    socket: U,
    remote: SocketAddrV4,
}

impl<U: DatagramSocket> DatagramLink<U> {
    pub fn new(socket: U, remote: SocketAddrV4) -> Self {
        Self { socket, remote }
    }

    pub fn remote(&self) -> SocketAddrV4 {
        self.remote
    }

    pub fn socket(&self) -> &U {
        &self.socket
    }

    pub fn socket_mut(&mut self) -> &mut U {
        &mut self.socket
    }

    pub fn send(&mut self, payload: &str) -> Result<(), SessionError> {
        match self.socket.send_to(self.remote, payload.as_bytes()) {
            Ok(()) => {
                trace!("datagram to {}: {}", self.remote, payload);
                Ok(())
            }
            Err(nb::Error::WouldBlock) => Err(SessionError::WouldBlock),
            Err(nb::Error::Other(e)) => {
                warn!("datagram to {} failed: {}", self.remote, e);
                Err(e.into())
            }
        }
    }
}
