// src/telemetry/orchestrator.rs

use super::acquisition::Acquisition;
use super::record::{PeripheralSnapshot, TelemetryRecord};
use crate::common::{error::SessionError, hal_traits::Board, timing, types::SensorReading};
use crate::config::Config;
use crate::sensor::SensorDecoder;
use crate::session::{
    http::StatusPage,
    wire::{encode_datagram, encode_line},
    ClientLink, DatagramLink, DatagramSocket, HttpServer, Signal, StreamTransport,
};
use core::time::Duration;
use log::{debug, info, warn};

/// Cooperative control loop tying the board, the sensor and one delivery link together.
///
/// Each variant has a `*_step` that runs one iteration (including its sleep)
/// and a `run_*` that repeats it forever.
pub struct Orchestrator<B: Board> {
    board: B,
    config: Config,
    acquisition: Acquisition,
}

impl<B: Board> Orchestrator<B> {
    pub fn new(board: B, config: Config) -> Self {
        let acquisition = Acquisition::new(SensorDecoder::new(config.decoder), config.min_sample_interval);
        Self {
            board,
            config,
            acquisition,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn acquisition(&self) -> &Acquisition {
        &self.acquisition
    }

    // --- Links built from the configuration ---

    pub fn client_link<T: StreamTransport>(&self, transport: T) -> ClientLink<T> {
        ClientLink::new(transport, self.config.link.remote).with_greeting(self.config.link.greeting)
    }

    pub fn http_server<T: StreamTransport>(&self, transport: T) -> HttpServer<T> {
        HttpServer::new(transport, self.config.link.listen_port)
    }

    pub fn datagram_link<U: DatagramSocket>(&self, socket: U) -> DatagramLink<U> {
        DatagramLink::new(socket, self.config.link.remote)
    }

    // --- Shared helpers ---

    /// Polls the sensor if allowed and reports a failed attempt.
    fn refresh_sensor(board: &mut B, acquisition: &mut Acquisition) -> SensorReading {
        if let Some(reading) = acquisition.sample(board) {
            if !reading.valid {
                match acquisition.last_good() {
                    Some(_) => warn!("sensor read failed, keeping last good reading"),
                    None => warn!("sensor read failed, no reading yet"),
                }
                board.signal(Signal::SensorFailed);
            }
        }
        acquisition.latest()
    }

    fn status_page(board: &mut B, acquisition: &mut Acquisition, config: &Config) -> StatusPage {
        let reading = Self::refresh_sensor(board, acquisition);
        StatusPage {
            button_pin: config.pins.button_a,
            button_pressed: board.read_digital(config.pins.button_a).is_low(),
            sensor_pin: config.pins.sensor,
            reading,
        }
    }

    /// Samples peripherals and sensor into a fresh record.
    pub fn compose_record(&mut self) -> TelemetryRecord {
        let peripherals = PeripheralSnapshot::read(&mut self.board, &self.config.pins);
        Self::refresh_sensor(&mut self.board, &mut self.acquisition);
        self.acquisition.record(peripherals)
    }

    /// Sleeps for `duration`, draining link events every poll slice.
    fn sleep_servicing<T: StreamTransport>(&mut self, link: &mut ClientLink<T>, duration: Duration) {
        let slice = timing::as_millis_u32(timing::POLL_SLICE);
        let mut remaining = timing::as_millis_u32(duration);
        while remaining > 0 {
            link.service(&mut self.board);
            let step = remaining.min(slice);
            self.board.delay_ms(step);
            remaining -= step;
        }
        link.service(&mut self.board);
    }

    // --- TCP line stream ---

    /// One iteration of the outbound client loop.
    ///
    /// Not connected: at most one connect attempt, then the reconnect backoff.
    /// Connected: one telemetry line, then the report interval.
    pub fn client_step<T: StreamTransport>(&mut self, link: &mut ClientLink<T>) {
        link.service(&mut self.board);

        if !link.is_active() {
            if link.session().is_idle() {
                if let Err(e) = link.begin_connect() {
                    warn!("connect to {} failed: {}", link.remote(), e);
                }
            }
            self.sleep_servicing(link, self.config.link.reconnect_backoff);
            link.abandon_pending();
            return;
        }

        let record = self.compose_record();
        let sent = encode_line(&record).and_then(|line| {
            debug!("sending {}", line.trim_end());
            link.send(&line)
        });
        match sent {
            Ok(()) => {}
            Err(SessionError::WouldBlock) => debug!("link busy, record dropped"),
            Err(e) => {
                warn!("telemetry send failed: {}", e);
                self.board.signal(Signal::SendFailed);
            }
        }
        self.sleep_servicing(link, self.config.link.report_interval);
    }

    pub fn run_client<T: StreamTransport>(mut self, mut link: ClientLink<T>) -> ! {
        info!("telemetry client for {}", link.remote());
        loop {
            self.client_step(&mut link);
        }
    }

    // --- HTTP status server ---

    /// One iteration of the server loop: start if needed, drain events, sleep.
    ///
    /// After a startup failure the server stays down and the fault is signalled
    /// on every iteration while the transport keeps being serviced.
    pub fn server_step<T: StreamTransport>(&mut self, server: &mut HttpServer<T>) {
        if !server.is_listening() && server.fault().is_none() {
            match server.start() {
                Ok(()) => self.board.signal(Signal::Ready),
                Err(fault) => self.board.signal(Signal::Fault(fault)),
            }
        }

        let Self {
            board,
            config,
            acquisition,
        } = self;
        server.service(board, |board| Self::status_page(board, acquisition, config));

        match server.fault() {
            Some(fault) => {
                board.signal(Signal::Fault(fault));
                board.delay_ms(100);
            }
            None => board.delay_ms(timing::as_millis_u32(timing::POLL_SLICE)),
        }
    }

    pub fn run_server<T: StreamTransport>(mut self, mut server: HttpServer<T>) -> ! {
        loop {
            self.server_step(&mut server);
        }
    }

    // --- UDP joystick datagrams ---

    /// One iteration of the datagram loop: read joystick, send, sleep.
    pub fn datagram_step<U: DatagramSocket>(&mut self, link: &mut DatagramLink<U>) {
        let x = self.board.read_analog(self.config.pins.joystick_x);
        let y = self.board.read_analog(self.config.pins.joystick_y);

        match encode_datagram(x, y).and_then(|msg| link.send(&msg)) {
            Ok(()) => self.board.signal(Signal::Delivered),
            Err(e) => {
                warn!("datagram dropped: {}", e);
                self.board.signal(Signal::SendFailed);
            }
        }
        self.board
            .delay_ms(timing::as_millis_u32(self.config.link.datagram_interval));
    }

    pub fn run_datagram<U: DatagramSocket>(mut self, mut link: DatagramLink<U>) -> ! {
        info!("joystick datagrams to {}", link.remote());
        loop {
            self.datagram_step(&mut link);
        }
    }
}
