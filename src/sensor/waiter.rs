// src/sensor/waiter.rs

use crate::common::{
    error::{TimeoutKind, WaitError},
    hal_traits::{Clock, SensorLine},
    types::Level,
};

/// Waits for the line to reach `target`, then measures how long it stays there.
///
/// Phase 1 spins until the line reads `target`, failing with
/// [`TimeoutKind::TargetLevel`] once more than `timeout_us` has elapsed.
/// Phase 2 restarts the time reference and spins while the line stays at
/// `target`, failing with [`TimeoutKind::LevelDuration`] past `timeout_us`.
///
/// # Returns
///
/// The time, in µs, the line was held at `target`. Never above `timeout_us`.
/// The call as a whole spins for at most `2 * timeout_us` plus one polling step.
pub fn wait_for_level<IF>(
    iface: &mut IF,
    target: Level,
    timeout_us: u32,
) -> Result<u32, WaitError<IF::Error>>
where
    IF: SensorLine + Clock,
{
    let start = iface.now_us();
    while iface.read_level()? != target {
        if iface.now_us().wrapping_sub(start) > timeout_us {
            return Err(WaitError::Timeout(TimeoutKind::TargetLevel));
        }
    }

    let start = iface.now_us();
    loop {
        let elapsed = iface.now_us().wrapping_sub(start);
        if elapsed > timeout_us {
            return Err(WaitError::Timeout(TimeoutKind::LevelDuration));
        }
        if iface.read_level()? != target {
            return Ok(elapsed);
        }
    }
}
