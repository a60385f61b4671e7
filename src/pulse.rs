//! Busy-poll pulse timing.
//!
//! The DHT22 signals each bit through how long it holds the line high, but
//! there is no assumption of a hardware timer here: durations are measured
//! as the number of iterations of a tight polling loop ("cycles"). The
//! counts are meaningless across CPUs, yet self-consistent within one read,
//! which is all the decoder needs since it only ever compares one pulse
//! against another (see [`crate::frame`]).

use embedded_hal::digital::{InputPin, PinState};

use crate::error::{DhtError, TimeoutKind};

/// Number of pulse phases captured per transmission: 40 bits, each a low
/// phase followed by a high phase.
pub const PULSE_COUNT: usize = 80;

/// Cycle counts for one full 40-bit transmission.
///
/// Even indices hold low-phase durations, odd indices the high-phase
/// duration of the same bit. Captured once per attempt and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct PulseTrace {
    pub(crate) counts: [u32; PULSE_COUNT],
}

impl PulseTrace {
    pub(crate) fn new() -> Self {
        Self {
            counts: [0; PULSE_COUNT],
        }
    }

    /// Low-phase cycle count of bit `bit`.
    pub fn low(&self, bit: usize) -> u32 {
        self.counts[2 * bit]
    }

    /// High-phase cycle count of bit `bit`.
    pub fn high(&self, bit: usize) -> u32 {
        self.counts[2 * bit + 1]
    }

    /// True if any phase ran into the sampling cap, meaning the line stopped
    /// transitioning mid-transmission. Such a trace must not be decoded.
    pub fn is_stalled(&self, cap: u32) -> bool {
        self.counts.iter().any(|&c| c == cap)
    }
}

/// Polls until the line reaches `level` and then leaves it again.
///
/// At most `timeout_cycles` polls are spent waiting for `level` to appear;
/// `on_timeout` is returned if it never does. Once the level is observed,
/// this blocks until the line transitions away, so that on return the
/// caller is aligned with the start of the next line segment rather than
/// some arbitrary point inside the current one.
pub fn wait_for_level<PIN: InputPin>(
    pin: &mut PIN,
    level: PinState,
    timeout_cycles: u32,
    on_timeout: TimeoutKind,
) -> Result<(), DhtError<PIN::Error>> {
    for _ in 0..timeout_cycles {
        if at_level(pin, level)? {
            while at_level(pin, level)? {}
            return Ok(());
        }
    }
    Err(DhtError::Timeout(on_timeout))
}

/// Counts polling iterations while the line stays at `level`.
///
/// Stops at the first transition or once the count reaches `cap`. A return
/// value equal to `cap` is the stall sentinel the sequencer checks for; it
/// is not reported as an error here.
pub fn count_cycles_at_level<PIN: InputPin>(
    pin: &mut PIN,
    level: PinState,
    cap: u32,
) -> Result<u32, PIN::Error> {
    let mut count = 0;
    while count < cap {
        if !at_level(pin, level)? {
            break;
        }
        count += 1;
    }
    Ok(count)
}

fn at_level<PIN: InputPin>(pin: &mut PIN, level: PinState) -> Result<bool, PIN::Error> {
    match level {
        PinState::High => pin.is_high(),
        PinState::Low => pin.is_low(),
    }
}
