// src/common/checksum.rs

//! Frame checksum of the DHT family.
//!
//! The fifth byte of a frame is the truncated (mod 256) sum of the four
//! payload bytes. This is an 8-bit additive checksum: it catches every
//! single-bit error, but compensating errors in two bytes (one bit up, one bit
//! down at the same weight) slip through. That is a property of the sensor
//! protocol and is accepted as-is.

/// Sums the payload bytes modulo 256.
///
/// # Arguments
///
/// * `payload`: the humidity/temperature bytes (normally 4 of them).
#[inline]
pub fn frame_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Checks a complete 5-byte frame.
///
/// # Returns
///
/// `Ok(())` if the checksum byte matches, otherwise `Err((received, computed))`.
pub fn verify_frame_checksum(frame: &[u8; 5]) -> Result<(), (u8, u8)> {
    let computed = frame_checksum(&frame[..4]);
    let received = frame[4];
    if computed == received {
        Ok(())
    } else {
        Err((received, computed))
    }
}
