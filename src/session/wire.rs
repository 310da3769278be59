// src/session/wire.rs

//! Text encodings of the pushed telemetry.

use crate::common::error::SessionError;
use crate::telemetry::TelemetryRecord;
use arrayvec::ArrayString;
use core::fmt::Write;

pub const LINE_CAPACITY: usize = 128;
pub const DATAGRAM_CAPACITY: usize = 32;

pub type TelemetryLine = ArrayString<LINE_CAPACITY>;
pub type JoystickDatagram = ArrayString<DATAGRAM_CAPACITY>;

/// `VRX=<x> VRY=<y> BTN=<0|1> A=<0|1> B=<0|1> TEMP=<t> UMI=<h>\n`, one decimal on the floats.
pub fn encode_line(record: &TelemetryRecord) -> Result<TelemetryLine, SessionError> {
    let p = &record.peripherals;
    let mut line = TelemetryLine::new();
    writeln!(
        line,
        "VRX={} VRY={} BTN={} A={} B={} TEMP={:.1} UMI={:.1}",
        p.joystick_x,
        p.joystick_y,
        u8::from(p.joystick_pressed),
        u8::from(p.button_a),
        u8::from(p.button_b),
        record.reading.temperature,
        record.reading.humidity,
    )
    .map_err(|_| SessionError::Format)?;
    Ok(line)
}

/// `VRX=<x> VRY=<y>`, no terminator.
pub fn encode_datagram(x: u16, y: u16) -> Result<JoystickDatagram, SessionError> {
    let mut msg = JoystickDatagram::new();
    write!(msg, "VRX={} VRY={}", x, y).map_err(|_| SessionError::Format)?;
    Ok(msg)
}
