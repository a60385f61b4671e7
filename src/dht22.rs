use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin, PinState},
};

use crate::error::{DhtError, TimeoutKind};
use crate::frame::{RawFrame, Reading};
use crate::pulse::{self, PULSE_COUNT, PulseTrace};

/// Host start signal: hold the line low long enough for the sensor to
/// notice (the sensor family requires at least 1 ms).
const HOST_START_LOW_US: u32 = 1000;

/// How long the host holds the line high before handing it to the sensor
/// (datasheet: the sensor answers within 20-30 us).
const HOST_RELEASE_US: u32 = 25;

/// Poll budget for each half of the sensor's acknowledgment.
const ACK_TIMEOUT_CYCLES: u32 = 10_000;

/// Per-phase cycle cap during bit sampling. Reaching it means the line
/// stopped transitioning; lowering it risks false timeouts on slow hosts.
const SAMPLE_CAP_CYCLES: u32 = 50_000;

/// Settling time between failed attempts. Shortening it raises the sensor
/// error rate; lengthening it only adds latency.
const COOLDOWN_US: u32 = 500_000;

/// Driver for the DHT22 temperature and humidity sensor.
///
/// One instance owns one data line for the duration of a read; callers
/// must serialize access to the pin themselves. The line is expected to
/// idle high via a pull-up, with `set_high` releasing it to the sensor.
pub struct Dht22<PIN, D> {
    pin: PIN,
    delay: D,
}

impl<PIN, DELAY, E> Dht22<PIN, DELAY>
where
    PIN: InputPin<Error = E> + OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the DHT22 driver.
    ///
    /// # Arguments
    ///
    /// * `pin` - The GPIO pin connected to the DHT22 data line. Must support both input and output.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Dht22 { pin, delay }
    }

    /// Reads a measurement, retrying transient failures up to `max_retries`
    /// times.
    ///
    /// Timeouts and checksum mismatches trigger a fixed cooldown followed by
    /// a fresh attempt; the cooldown runs only between attempts, never after
    /// the last one. `max_retries = 0` means exactly one attempt. Pin faults
    /// are never retried. When the budget is exhausted the error of the
    /// final attempt is returned.
    pub fn read(&mut self, max_retries: u32) -> Result<Reading, DhtError<E>> {
        let mut attempts = 0;
        loop {
            match self.read_once() {
                Ok(reading) => return Ok(reading),
                Err(err) if err.is_transient() && attempts < max_retries => {
                    self.delay.delay_us(COOLDOWN_US);
                    attempts += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Performs a single read attempt with no retries.
    ///
    /// Runs the full sequence: start signal, acknowledgment handshake,
    /// 80-pulse capture, bit decoding, checksum validation and value
    /// conversion.
    pub fn read_once(&mut self) -> Result<Reading, DhtError<E>> {
        let trace = self.capture()?;
        Ok(RawFrame::decode(&trace)?.reading())
    }

    /// Drives the handshake and captures the cycle counts of all 80 pulse
    /// phases (a low and a high phase per bit).
    fn capture(&mut self) -> Result<PulseTrace, DhtError<E>> {
        self.start_signal()?;

        // The sensor acknowledges by pulling the line low, then high.
        pulse::wait_for_level(
            &mut self.pin,
            PinState::Low,
            ACK_TIMEOUT_CYCLES,
            TimeoutKind::AckLow,
        )?;
        pulse::wait_for_level(
            &mut self.pin,
            PinState::High,
            ACK_TIMEOUT_CYCLES,
            TimeoutKind::AckHigh,
        )?;

        let mut trace = PulseTrace::new();
        for i in (0..PULSE_COUNT).step_by(2) {
            trace.counts[i] =
                pulse::count_cycles_at_level(&mut self.pin, PinState::Low, SAMPLE_CAP_CYCLES)?;
            trace.counts[i + 1] =
                pulse::count_cycles_at_level(&mut self.pin, PinState::High, SAMPLE_CAP_CYCLES)?;
        }

        // A mid-transmission stall is the same failure as a missing ack.
        if trace.is_stalled(SAMPLE_CAP_CYCLES) {
            return Err(DhtError::Timeout(TimeoutKind::Sampling));
        }

        Ok(trace)
    }

    /// Sends the host start signal and releases the line to the sensor.
    fn start_signal(&mut self) -> Result<(), DhtError<E>> {
        self.pin.set_low()?;
        self.delay.delay_us(HOST_START_LOW_US);
        self.pin.set_high()?;
        self.delay.delay_us(HOST_RELEASE_US);
        Ok(())
    }
}
