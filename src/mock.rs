// src/mock.rs

//! Hand-written test doubles for the HAL and transport traits.
//!
//! `MockBoard` keeps a virtual microsecond clock that advances by one tick on
//! every `now_us()` call, so busy-wait loops always make progress. The sensor
//! line replays a scripted waveform that starts the moment the line is
//! switched to input, like a real DHT answering the host start signal.

use crate::common::frame::RawSensorFrame;
use crate::common::hal_traits::{Clock, Indicator, Peripherals, SensorLine};
use crate::common::types::{Direction, Level};
use crate::common::TransportError;
use crate::session::transport::{ConnId, DatagramSocket, StreamTransport};
use crate::session::{Event, Signal};
use core::cell::Cell;
use core::net::SocketAddrV4;
use heapless::{Deque, Vec};

// --- Waveforms ---

pub type Waveform = Vec<(Level, u32), 96>;

/// Pulse widths used to synthesize sensor answers.
#[derive(Debug, Copy, Clone)]
pub struct PulseWidths {
    pub pre_ack_high: u32,
    pub ack_low: u32,
    pub ack_high: u32,
    pub bit_low: u32,
    pub zero_high: u32,
    pub one_high: u32,
}

impl PulseWidths {
    pub const NOMINAL: Self = Self {
        pre_ack_high: 30,
        ack_low: 80,
        ack_high: 80,
        bit_low: 50,
        zero_high: 26,
        one_high: 70,
    };
}

/// Waveform of a sensor clocking out `bytes` with the given pulse widths.
pub fn waveform_with(bytes: [u8; 5], widths: PulseWidths) -> Waveform {
    let mut wave = Waveform::new();
    let _ = wave.push((Level::High, widths.pre_ack_high));
    let _ = wave.push((Level::Low, widths.ack_low));
    let _ = wave.push((Level::High, widths.ack_high));
    for byte in bytes {
        for bit in (0..8).rev() {
            let high = if byte & (1 << bit) != 0 {
                widths.one_high
            } else {
                widths.zero_high
            };
            let _ = wave.push((Level::Low, widths.bit_low));
            let _ = wave.push((Level::High, high));
        }
    }
    let _ = wave.push((Level::Low, widths.bit_low));
    wave
}

/// Waveform of a well-behaved sensor sending `bytes`.
pub fn waveform(bytes: [u8; 5]) -> Waveform {
    waveform_with(bytes, PulseWidths::NOMINAL)
}

/// Waveform of a sensor sending a checksum-valid reading of whole numbers.
pub fn reading_waveform(humidity: u8, temperature: u8) -> Waveform {
    let sum = humidity.wrapping_add(temperature);
    waveform(*RawSensorFrame::from_bytes([humidity, 0, temperature, 0, sum]).as_bytes())
}

// --- Board ---

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockPinError;

pub struct MockBoard {
    now: Cell<u32>,
    pub tick_us: u32,
    pub direction: Direction,
    pub driven: Vec<Level, 8>,
    scripts: Deque<Waveform, 8>,
    active: Option<(Waveform, u32)>,
    /// Level of the line once a script has played out (pull-up).
    pub idle_level: Level,
    pub fail_reads: bool,
    pub digital: [Level; 32],
    pub analog: [u16; 4],
    pub signals: Vec<Signal, 256>,
    pub decode_attempts: u32,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now: u32) -> Self {
        Self {
            now: Cell::new(now),
            tick_us: 1,
            direction: Direction::Input,
            driven: Vec::new(),
            scripts: Deque::new(),
            active: None,
            idle_level: Level::High,
            fail_reads: false,
            digital: [Level::High; 32],
            analog: [0; 4],
            signals: Vec::new(),
            decode_attempts: 0,
        }
    }

    /// Queues the answer for the next start signal.
    pub fn queue(&mut self, wave: Waveform) {
        let _ = self.scripts.push_back(wave);
    }

    /// Plays `wave` right away, without a start signal.
    pub fn play(&mut self, wave: Waveform) {
        self.active = Some((wave, self.now.get()));
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    pub fn advance(&self, us: u32) {
        self.now.set(self.now.get().wrapping_add(us));
    }

    pub fn press(&mut self, pin: u8) {
        self.digital[usize::from(pin)] = Level::Low;
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|s| **s == signal).count()
    }

    fn line_level(&self) -> Level {
        let Some((wave, armed_at)) = &self.active else {
            return self.idle_level;
        };
        let mut t = self.now.get().wrapping_sub(*armed_at);
        for (level, width) in wave.iter() {
            if t < *width {
                return *level;
            }
            t -= *width;
        }
        self.idle_level
    }
}

impl Clock for MockBoard {
    fn now_us(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.tick_us));
        now
    }

    fn delay_us(&mut self, us: u32) {
        self.advance(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms.saturating_mul(1000));
    }
}

impl SensorLine for MockBoard {
    type Error = MockPinError;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Output => {
                self.active = None;
                self.decode_attempts += 1;
            }
            Direction::Input if self.direction == Direction::Output => {
                let now = self.now.get();
                self.active = self.scripts.pop_front().map(|wave| (wave, now));
            }
            Direction::Input => {}
        }
        self.direction = direction;
        Ok(())
    }

    fn write_level(&mut self, level: Level) -> Result<(), Self::Error> {
        let _ = self.driven.push(level);
        Ok(())
    }

    fn read_level(&mut self) -> Result<Level, Self::Error> {
        if self.fail_reads {
            return Err(MockPinError);
        }
        Ok(self.line_level())
    }
}

impl Peripherals for MockBoard {
    fn read_digital(&mut self, pin: u8) -> Level {
        self.digital.get(usize::from(pin)).copied().unwrap_or(Level::High)
    }

    fn read_analog(&mut self, channel: u8) -> u16 {
        self.analog.get(usize::from(channel)).copied().unwrap_or(0)
    }
}

impl Indicator for MockBoard {
    fn signal(&mut self, signal: Signal) {
        let _ = self.signals.push(signal);
    }
}

// --- Stream transport ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Listen { port: u16, backlog: u8 },
    Connect(SocketAddrV4),
    Write { conn: ConnId, len: usize },
    Unregister(ConnId),
    Close(ConnId),
    Abort(ConnId),
}

#[derive(Debug, Clone)]
pub enum Scripted {
    Accepted(ConnId),
    Connected(ConnId),
    Data(ConnId, Vec<u8, 64>),
    RemoteClosed(ConnId),
    Acked(ConnId, usize),
    Errored(ConnId, TransportError),
}

impl Scripted {
    pub fn data(conn: ConnId, bytes: &[u8]) -> Self {
        let mut v = Vec::new();
        let _ = v.extend_from_slice(bytes);
        Scripted::Data(conn, v)
    }
}

pub struct MockTransport {
    pub ops: Vec<Op, 256>,
    pub events: Deque<Scripted, 16>,
    pub written: Vec<u8, 2048>,
    pub next_id: u16,
    pub listen_result: Result<(), TransportError>,
    pub connect_result: Result<(), TransportError>,
    pub write_result: nb::Result<(), TransportError>,
    pub close_result: Result<(), TransportError>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            events: Deque::new(),
            written: Vec::new(),
            next_id: 1,
            listen_result: Ok(()),
            connect_result: Ok(()),
            write_result: Ok(()),
            close_result: Ok(()),
        }
    }

    pub fn push(&mut self, event: Scripted) {
        let _ = self.events.push_back(event);
    }

    pub fn connects(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Connect(_))).count()
    }

    pub fn writes(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, Op::Write { .. })).count()
    }

    pub fn written_str(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }
}

impl StreamTransport for MockTransport {
    fn listen(&mut self, port: u16, backlog: u8) -> Result<(), TransportError> {
        let _ = self.ops.push(Op::Listen { port, backlog });
        self.listen_result
    }

    fn connect(&mut self, remote: SocketAddrV4) -> Result<ConnId, TransportError> {
        let _ = self.ops.push(Op::Connect(remote));
        self.connect_result?;
        let id = ConnId::new(self.next_id);
        self.next_id += 1;
        Ok(id)
    }

    fn write(&mut self, conn: ConnId, data: &[u8]) -> nb::Result<(), TransportError> {
        self.write_result?;
        let _ = self.ops.push(Op::Write { conn, len: data.len() });
        let _ = self.written.extend_from_slice(data);
        Ok(())
    }

    fn unregister(&mut self, conn: ConnId) {
        let _ = self.ops.push(Op::Unregister(conn));
    }

    fn close(&mut self, conn: ConnId) -> Result<(), TransportError> {
        let _ = self.ops.push(Op::Close(conn));
        self.close_result
    }

    fn abort(&mut self, conn: ConnId) {
        let _ = self.ops.push(Op::Abort(conn));
    }

    fn poll<'b>(&mut self, buf: &'b mut [u8]) -> Option<Event<'b>> {
        let event = self.events.pop_front()?;
        Some(match event {
            Scripted::Accepted(conn) => Event::Accepted(conn),
            Scripted::Connected(conn) => Event::Connected(conn),
            Scripted::Data(conn, bytes) => {
                let len = bytes.len().min(buf.len());
                buf[..len].copy_from_slice(&bytes[..len]);
                Event::DataReceived {
                    conn,
                    data: &buf[..len],
                }
            }
            Scripted::RemoteClosed(conn) => Event::RemoteClosed(conn),
            Scripted::Acked(conn, len) => Event::SendAcknowledged { conn, len },
            Scripted::Errored(conn, error) => Event::Errored { conn, error },
        })
    }
}

// --- Datagram socket ---

pub struct MockSocket {
    pub sent: Vec<(SocketAddrV4, Vec<u8, 64>), 16>,
    pub result: nb::Result<(), TransportError>,
}

impl MockSocket {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            result: Ok(()),
        }
    }
}

impl DatagramSocket for MockSocket {
    fn send_to(&mut self, remote: SocketAddrV4, data: &[u8]) -> nb::Result<(), TransportError> {
        self.result?;
        let mut payload = Vec::new();
        let _ = payload.extend_from_slice(data);
        let _ = self.sent.push((remote, payload));
        Ok(())
    }
}
