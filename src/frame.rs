//! Frame decoding and value conversion.

use crate::error::DhtError;
use crate::pulse::PulseTrace;

/// Bits in one sensor transmission.
pub const FRAME_BITS: usize = 40;

/// Bytes in one sensor transmission: humidity, temperature, checksum.
pub const FRAME_BYTES: usize = 5;

/// Reading returned by the DHT22 sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}

/// The validated 5-byte payload of one transmission.
///
/// Bytes 0-1 are humidity in tenths of a percent (big-endian), bytes 2-3
/// temperature in tenths of a degree, byte 4 the checksum. Constructing a
/// `RawFrame` via [`RawFrame::decode`] implies the checksum held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame {
    bytes: [u8; FRAME_BYTES],
}

impl RawFrame {
    /// Decodes 40 bits out of a pulse trace and validates the checksum.
    ///
    /// A bit is 1 when its high phase lasted strictly more cycles than its
    /// low phase. The sensor holds the line low for the same time on every
    /// bit and stretches only the high phase (roughly 28us for a 0, 70us
    /// for a 1), so comparing the two phases of the same bit needs no
    /// absolute threshold and is immune to the host's polling speed.
    pub fn decode<E>(trace: &PulseTrace) -> Result<Self, DhtError<E>> {
        let mut bytes = [0u8; FRAME_BYTES];
        for bit in 0..FRAME_BITS {
            bytes[bit / 8] <<= 1;
            if trace.high(bit) > trace.low(bit) {
                bytes[bit / 8] |= 1;
            }
        }

        let frame = Self { bytes };
        if frame.bytes[4] != frame.checksum() {
            return Err(DhtError::ChecksumMismatch);
        }
        Ok(frame)
    }

    /// Truncated sum of the four data bytes.
    fn checksum(&self) -> u8 {
        self.bytes[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Converts the data bytes into a reading.
    ///
    /// Both values are the big-endian 16-bit raw quantity divided by 10.
    /// Out-of-range values pass through unchanged, and the sensor family's
    /// conventional sign flag in bit 15 of the temperature word is not
    /// interpreted.
    pub fn reading(&self) -> Reading {
        let [hum_hi, hum_lo, temp_hi, temp_lo, _checksum] = self.bytes;
        Reading {
            humidity: f64::from(u16::from_be_bytes([hum_hi, hum_lo])) / 10.0,
            temperature: f64::from(u16::from_be_bytes([temp_hi, temp_lo])) / 10.0,
        }
    }

    /// The raw frame bytes, checksum included.
    pub fn bytes(&self) -> [u8; FRAME_BYTES] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::PULSE_COUNT;
    use core::convert::Infallible;

    // Datasheet figures: 50us low phase, then 28us high for a 0 and 70us
    // high for a 1.
    fn trace_for_bytes(bytes: [u8; FRAME_BYTES]) -> PulseTrace {
        let mut trace = PulseTrace::new();
        for bit in 0..FRAME_BITS {
            let set = (bytes[bit / 8] >> (7 - bit % 8)) & 1 == 1;
            trace.counts[2 * bit] = 50;
            trace.counts[2 * bit + 1] = if set { 70 } else { 28 };
        }
        trace
    }

    fn with_checksum(b0: u8, b1: u8, b2: u8, b3: u8) -> [u8; FRAME_BYTES] {
        [
            b0,
            b1,
            b2,
            b3,
            b0.wrapping_add(b1).wrapping_add(b2).wrapping_add(b3),
        ]
    }

    fn decode(trace: &PulseTrace) -> Result<RawFrame, DhtError<Infallible>> {
        RawFrame::decode(trace)
    }

    #[test]
    fn test_decode_reproduces_bytes() {
        for bytes in [
            with_checksum(0x02, 0x8A, 0x01, 0x09),
            with_checksum(0x00, 0x00, 0x00, 0x00),
            with_checksum(0xFF, 0xFF, 0xFF, 0xFF),
            with_checksum(0x01, 0x90, 0x80, 0x0A),
        ] {
            let frame = decode(&trace_for_bytes(bytes)).unwrap();
            assert_eq!(frame.bytes(), bytes);
        }
    }

    #[test]
    fn test_checksum_wraps_mod_256() {
        // 100 + 100 + 60 + 0 = 260, truncated to 4.
        let bytes = with_checksum(100, 100, 60, 0);
        assert_eq!(bytes[4], 4);

        let frame = decode(&trace_for_bytes(bytes)).unwrap();
        assert_eq!(frame.bytes(), bytes);
    }

    #[test]
    fn test_decode_rejects_bad_checksum() {
        let mut bytes = with_checksum(0x02, 0x8A, 0x01, 0x09);
        bytes[4] = bytes[4].wrapping_add(1);

        let err = decode(&trace_for_bytes(bytes)).unwrap_err();
        assert_eq!(err, DhtError::ChecksumMismatch);
    }

    #[test]
    fn test_bit_rule_relative_comparison() {
        // First bit of an otherwise all-zero frame, with a valid checksum
        // either way (all bytes stay zero except possibly byte 0).
        let mut trace = PulseTrace::new();
        for i in 0..PULSE_COUNT {
            trace.counts[i] = if i % 2 == 0 { 50 } else { 28 };
        }

        // Shorter high phase: 0.
        trace.counts[1] = 28;
        let frame = decode(&trace).unwrap();
        assert_eq!(frame.bytes()[0], 0x00);

        // Equal counts decode as 0 by the not-greater-than rule.
        trace.counts[1] = 50;
        let frame = decode(&trace).unwrap();
        assert_eq!(frame.bytes()[0], 0x00);

        // Longer high phase: 1. Fix up the checksum pulse widths to match.
        trace.counts[1] = 70;
        for bit in 32..FRAME_BITS {
            let set = (0x80u8 >> (7 - (bit - 32))) & 1 == 1;
            trace.counts[2 * bit + 1] = if set { 70 } else { 28 };
        }
        let frame = decode(&trace).unwrap();
        assert_eq!(frame.bytes()[0], 0x80);
    }

    #[test]
    fn test_reading_conversion() {
        // Humidity raw 0x028A = 650, temperature raw 0x0109 = 265.
        let frame = decode(&trace_for_bytes(with_checksum(0x02, 0x8A, 0x01, 0x09))).unwrap();
        assert_eq!(
            frame.reading(),
            Reading {
                humidity: 65.0,
                temperature: 26.5,
            }
        );
    }

    #[test]
    fn test_reading_passes_sign_bit_through() {
        // Bit 15 of the temperature word is not special-cased; the raw
        // value converts as-is.
        let frame = decode(&trace_for_bytes(with_checksum(0x01, 0x90, 0x80, 0x0A))).unwrap();
        let reading = frame.reading();
        assert_eq!(reading.humidity, 40.0);
        assert_eq!(reading.temperature, 3277.8);
    }
}
