// src/session/server.rs

use super::http::{StatusPage, BODY_CAPACITY};
use super::state::{Action, ConnectionState, Role, Session};
use super::transport::{ConnId, StreamTransport};
use super::{close_connection, discard_connection, write_with_timeout, Fault, Signal};
use crate::common::hal_traits::{Clock, Indicator};
use crate::common::timing;
use log::{debug, error, info, warn};

const RX_BUFFER: usize = 512;

/// Single-client HTTP status server.
///
/// Every request is answered with one freshly rendered page and the
/// connection is closed as soon as the peer acknowledges it.
pub struct HttpServer<T> {
    transport: T,
    session: Session,
    port: u16,
    fault: Option<Fault>,
    listening: bool,
}

impl<T: StreamTransport> HttpServer<T> {
    pub fn new(transport: T, port: u16) -> Self {
        Self {
            transport,
            session: Session::new(Role::Server),
            port,
            fault: None,
            listening: false,
        }
    }

    /// Binds and listens with a backlog of one.
    ///
    /// On failure the server stays halted; [`fault`](Self::fault) reports why.
    pub fn start(&mut self) -> Result<(), Fault> {
        if self.listening {
            return Ok(());
        }
        match self.transport.listen(self.port, 1) {
            Ok(()) => {
                info!("http server listening on port {}", self.port);
                self.listening = true;
                self.fault = None;
                Ok(())
            }
            Err(e) => {
                let fault = Fault::from(e);
                error!("http server startup failed: {} ({:?})", e, fault);
                self.fault = Some(fault);
                Err(fault)
            }
        }
    }

    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drains every pending transport event.
    ///
    /// `page` is called once per `GET` to build the response from fresh data.
    ///
    /// # Returns
    ///
    /// Number of events handled.
    pub fn service<B, F>(&mut self, board: &mut B, mut page: F) -> usize
    where
        B: Indicator + Clock,
        F: FnMut(&mut B) -> StatusPage,
    {
        let mut buf = [0u8; RX_BUFFER];
        let mut handled = 0;
        while let Some(event) = self.transport.poll(&mut buf) {
            handled += 1;
            let action = self.session.handle_event(&event);
            debug!("http {:?} -> {:?}", event.conn(), action);
            match action {
                Action::None | Action::Greet(_) => {}
                Action::Reject(conn) => {
                    info!("refusing {:?}: a client is already being served", conn);
                    let _ = discard_connection(&mut self.transport, conn);
                }
                Action::Respond(conn) => {
                    let status = page(board);
                    if let Err(signal) = self.respond(board, conn, &status) {
                        board.signal(signal);
                        let _ = close_connection(&mut self.transport, &mut self.session, conn);
                    }
                }
                Action::Delivered(conn) => {
                    board.signal(Signal::Delivered);
                    if self.session.state() == ConnectionState::Closing {
                        let _ = close_connection(&mut self.transport, &mut self.session, conn);
                    }
                }
                Action::Close(conn) => {
                    let _ = close_connection(&mut self.transport, &mut self.session, conn);
                }
                Action::Release(conn) => {
                    warn!("http connection {:?} lost", conn);
                    self.transport.unregister(conn);
                    board.signal(Signal::ConnectionLost);
                }
            }
        }
        handled
    }

    fn respond<C: Clock>(&mut self, clock: &mut C, conn: ConnId, status: &StatusPage) -> Result<(), Signal> {
        let response = status.render().map_err(|e| {
            warn!("status page dropped: {} (body limit {})", e, BODY_CAPACITY);
            Signal::ResponseTooLarge
        })?;
        write_with_timeout(
            &mut self.transport,
            clock,
            conn,
            response.as_bytes(),
            timing::RESPONSE_WRITE_TIMEOUT,
        )
        .map_err(|e| {
            warn!("response write on {:?} failed: {:?}", conn, e);
            Signal::WriteFailed
        })?;
        debug!("sent {} byte response on {:?}", response.len(), conn);
        Ok(())
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::TransportError;
    use crate::common::types::SensorReading;
    use crate::mock::{MockBoard, MockTransport, Op, Scripted};

    const A: ConnId = ConnId::new(1);
    const B: ConnId = ConnId::new(2);

    fn page_with(reading: SensorReading) -> impl FnMut(&mut MockBoard) -> StatusPage {
        move |_| StatusPage {
            button_pin: 5,
            button_pressed: false,
            sensor_pin: 8,
            reading,
        }
    }

    fn started() -> HttpServer<MockTransport> {
        let mut server = HttpServer::new(MockTransport::new(), 8081);
        server.start().unwrap();
        server
    }

    #[test]
    fn test_start_listens_with_backlog_one() {
        let server = started();
        assert!(server.is_listening());
        assert_eq!(server.transport().ops.as_slice(), &[Op::Listen { port: 8081, backlog: 1 }]);
    }

    #[test]
    fn test_start_failures_map_to_faults() {
        for (err, fault) in [
            (TransportError::OutOfHandles, Fault::Allocate),
            (TransportError::Bind, Fault::Bind),
            (TransportError::Listen, Fault::Listen),
        ] {
            let mut t = MockTransport::new();
            t.listen_result = Err(err);
            let mut server = HttpServer::new(t, 8081);
            assert_eq!(server.start(), Err(fault));
            assert_eq!(server.fault(), Some(fault));
            assert!(!server.is_listening());
        }
    }

    #[test]
    fn test_get_with_valid_reading() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::data(A, b"GET / HTTP/1.1\r\n\r\n"));

        assert_eq!(server.service(&mut board, page_with(SensorReading::new(25.0, 60.0))), 2);
        let sent = server.transport().written_str();
        assert!(sent.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(sent.contains("25.0"));
        assert!(sent.contains("class=\"value-ok\">OK"));
        assert!(!sent.contains("class=\"value-fail\">"));
        let len = sent.len();
        assert!(server.session().is_active());

        // Acknowledgment closes the connection and frees the slot.
        server.transport_mut().push(Scripted::Acked(A, len));
        server.service(&mut board, page_with(SensorReading::invalid()));
        assert!(server.session().is_idle());
        assert_eq!(board.count(Signal::Delivered), 1);
        let ops = &server.transport().ops;
        assert_eq!(&ops[ops.len() - 2..], &[Op::Unregister(A), Op::Close(A)]);
    }

    #[test]
    fn test_get_with_failed_reading() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::data(A, b"GET /"));

        server.service(&mut board, page_with(SensorReading::invalid()));
        let sent = server.transport().written_str();
        assert!(sent.contains("-99.0"));
        assert!(sent.contains("class=\"value-fail\">Read failure"));
        assert!(!sent.contains("class=\"value-ok\">OK"));
    }

    #[test]
    fn test_second_client_rejected() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::Accepted(B));

        server.service(&mut board, page_with(SensorReading::invalid()));
        assert_eq!(server.session().connection(), Some(A));
        assert!(server.session().is_active());
        let ops = &server.transport().ops;
        assert_eq!(&ops[1..], &[Op::Unregister(B), Op::Close(B)]);
    }

    #[test]
    fn test_non_get_closed_without_response() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::data(A, b"PUT /x"));

        server.service(&mut board, page_with(SensorReading::invalid()));
        assert_eq!(server.transport().writes(), 0);
        assert!(server.session().is_idle());
    }

    #[test]
    fn test_write_failure_signals_and_closes() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().write_result = Err(nb::Error::Other(TransportError::Write));
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::data(A, b"GET /"));

        server.service(&mut board, page_with(SensorReading::invalid()));
        assert_eq!(board.count(Signal::WriteFailed), 1);
        assert!(server.session().is_idle());
    }

    #[test]
    fn test_connection_error_frees_slot() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::Errored(A, TransportError::Reset));
        server.transport_mut().push(Scripted::Accepted(B));

        server.service(&mut board, page_with(SensorReading::invalid()));
        assert_eq!(board.count(Signal::ConnectionLost), 1);
        assert_eq!(server.session().connection(), Some(B));
        // Only handler removal for the dead handle, no close.
        assert!(!server.transport().ops.contains(&Op::Close(A)));
        assert!(server.transport().ops.contains(&Op::Unregister(A)));
    }

    #[test]
    fn test_remote_close_frees_slot() {
        let mut server = started();
        let mut board = MockBoard::new();
        server.transport_mut().push(Scripted::Accepted(A));
        server.transport_mut().push(Scripted::RemoteClosed(A));

        server.service(&mut board, page_with(SensorReading::invalid()));
        assert!(server.session().is_idle());
    }
}
