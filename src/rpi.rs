//! Raspberry Pi GPIO backend.
//!
//! Glue between the platform-agnostic driver and `rppal`: a data-line pin
//! that flips between output (host start signal) and input (everything
//! after), and the high-level [`read`] entry point the CLI and FFI front
//! ends share.

use core::convert::Infallible;
use std::fmt;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use rppal::gpio::{Bias, Gpio, IoPin, Level, Mode};
use rppal::hal::Delay;

use crate::dht22::Dht22;
use crate::error::DhtError;
use crate::frame::Reading;

/// The DHT22 data line on a Raspberry Pi GPIO.
///
/// The sensor protocol needs the same pin driven by the host first and
/// sampled afterwards, so writes switch the pin to output mode and reads
/// switch it back to input on demand. The built-in pull-up keeps the
/// released line high, matching the sensor's open-drain expectations.
pub struct OneWirePin {
    pin: IoPin,
}

impl OneWirePin {
    /// Claims `pin` (BCM numbering) as a pulled-up data line.
    pub fn open(gpio: &Gpio, pin: u8) -> Result<Self, rppal::gpio::Error> {
        let mut pin = gpio.get(pin)?.into_io(Mode::Input);
        pin.set_bias(Bias::PullUp);
        Ok(Self { pin })
    }

    fn ensure_mode(&mut self, mode: Mode) {
        if self.pin.mode() != mode {
            self.pin.set_mode(mode);
        }
    }
}

impl ErrorType for OneWirePin {
    type Error = Infallible;
}

impl OutputPin for OneWirePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.ensure_mode(Mode::Output);
        self.pin.write(Level::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.ensure_mode(Mode::Output);
        self.pin.write(Level::High);
        Ok(())
    }
}

impl InputPin for OneWirePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.ensure_mode(Mode::Input);
        Ok(self.pin.read() == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.ensure_mode(Mode::Input);
        Ok(self.pin.read() == Level::Low)
    }
}

/// Errors from the high-level [`read`] entry point.
#[derive(Debug)]
pub enum ReadError {
    /// The GPIO backend could not be initialized. Fatal, never retried.
    Driver(rppal::gpio::Error),
    /// The sensor protocol failed on every attempt within the retry budget.
    Sensor(DhtError<Infallible>),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Driver(err) => write!(f, "GPIO driver init failed: {err}"),
            Self::Sensor(err) => write!(f, "sensor read failed: {err}"),
        }
    }
}

impl std::error::Error for ReadError {}

impl From<rppal::gpio::Error> for ReadError {
    fn from(err: rppal::gpio::Error) -> Self {
        Self::Driver(err)
    }
}

impl From<DhtError<Infallible>> for ReadError {
    fn from(err: DhtError<Infallible>) -> Self {
        Self::Sensor(err)
    }
}

/// Reads humidity and temperature from the DHT22 on `pin`, retrying
/// transient failures up to `max_retries` times.
pub fn read(pin: u8, max_retries: u32) -> Result<Reading, ReadError> {
    let gpio = Gpio::new()?;
    let line = OneWirePin::open(&gpio, pin)?;
    let reading = Dht22::new(line, Delay::new()).read(max_retries)?;
    Ok(reading)
}
