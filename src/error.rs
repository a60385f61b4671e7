use core::fmt;

/// Which wait the sensor failed to satisfy before the cycle budget ran out.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    /// The sensor never pulled the line low to acknowledge the start signal.
    AckLow,
    /// The sensor acknowledged low but never released the line high.
    AckHigh,
    /// The line stalled mid-transmission while sampling the 40 data bits.
    Sampling,
}

/// Possible errors from the DHT22 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// Timed out waiting for a pin state change.
    Timeout(TimeoutKind),
    /// Checksum did not match the received data.
    ChecksumMismatch,
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> DhtError<E> {
    /// Whether the retry controller may recover from this error by
    /// attempting another read after a cooldown.
    ///
    /// Timeouts and checksum mismatches are line noise; pin faults are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ChecksumMismatch)
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AckLow => f.write_str("no low acknowledgment from sensor"),
            Self::AckHigh => f.write_str("no high acknowledgment from sensor"),
            Self::Sampling => f.write_str("line stalled during bit sampling"),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(kind) => write!(f, "timed out: {kind}"),
            Self::ChecksumMismatch => f.write_str("checksum did not match received data"),
            Self::PinError(err) => write!(f, "GPIO pin error: {err:?}"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for DhtError<E> {}
