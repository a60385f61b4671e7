//! C ABI surface for host-language bindings.
//!
//! Mirrors the signature bindings historically expect from DHT22 reader
//! libraries: integer status codes, out-pointers for the two values. Codes
//! are stable and part of the interface.

use crate::error::DhtError;
use crate::rpi::{self, ReadError};
use crate::rt;

/// Read succeeded; both out-pointers were written.
pub const DHT_OK: i32 = 0;
/// The sensor never responded, or the line stalled, on every attempt.
pub const DHT_ERR_TIMEOUT: i32 = 1;
/// The GPIO backend could not be initialized.
pub const DHT_ERR_DRIVER: i32 = 2;
/// Every attempt decoded a frame whose checksum did not match.
pub const DHT_ERR_CHECKSUM: i32 = 3;
/// An out-pointer was null; the hardware was not touched.
pub const DHT_ERR_INVALID: i32 = 4;

/// Reads the DHT22 on `pin` (BCM numbering), retrying transient failures
/// up to `max_retries` times, and stores the result through the given
/// pointers.
///
/// Scheduling elevation is attempted before the read and silently skipped
/// when unavailable.
///
/// # Safety
///
/// `humidity` and `temperature` must be null or valid for writes of `f64`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dht22_read(
    pin: u8,
    max_retries: u32,
    humidity: *mut f64,
    temperature: *mut f64,
) -> i32 {
    if humidity.is_null() || temperature.is_null() {
        return DHT_ERR_INVALID;
    }

    // Best effort; an unprivileged caller still gets a read.
    let _ = rt::elevate();

    match rpi::read(pin, max_retries) {
        Ok(reading) => {
            // SAFETY: both pointers were null-checked above and the caller
            // guarantees they are valid for writes.
            unsafe {
                *humidity = reading.humidity;
                *temperature = reading.temperature;
            }
            DHT_OK
        }
        Err(ReadError::Driver(_)) => DHT_ERR_DRIVER,
        Err(ReadError::Sensor(DhtError::Timeout(_))) => DHT_ERR_TIMEOUT,
        Err(ReadError::Sensor(DhtError::ChecksumMismatch)) => DHT_ERR_CHECKSUM,
        Err(ReadError::Sensor(DhtError::PinError(err))) => match err {},
    }
}
