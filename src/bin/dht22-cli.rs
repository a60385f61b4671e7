//! Command-line reader for a DHT22 on a Raspberry Pi GPIO pin.

use std::process::ExitCode;

use dht22_pulse::rpi::{self, ReadError};
use dht22_pulse::DhtError;
use dht22_pulse::rt;

const DEFAULT_PIN: u8 = 4;
const DEFAULT_RETRIES: u32 = 30;

// Process exit codes, stable alongside the FFI status codes.
const EXIT_TIMEOUT: u8 = 1;
const EXIT_DRIVER: u8 = 2;
const EXIT_CHECKSUM: u8 = 3;
const EXIT_INVALID: u8 = 4;

struct Args {
    pin: u8,
    retries: u32,
}

fn usage(program: &str) {
    eprintln!("usage: {program} [-p <gpio-pin>] [-r <max-retries>]");
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        pin: DEFAULT_PIN,
        retries: DEFAULT_RETRIES,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "-p" => {
                args.pin = value
                    .parse()
                    .map_err(|_| format!("invalid pin number: {value}"))?;
            }
            "-r" => {
                args.retries = value
                    .parse()
                    .map_err(|_| format!("invalid retry count: {value}"))?;
            }
            _ => return Err(format!("unknown option: {flag}")),
        }
    }

    Ok(args)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            usage(&std::env::args().next().unwrap_or_else(|| "dht22-cli".into()));
            return ExitCode::from(EXIT_INVALID);
        }
    };

    // Keep the scheduler from preempting the cycle-counting loops. Not
    // having the privilege only raises the retry rate.
    if let Err(err) = rt::elevate() {
        log::warn!("real-time elevation unavailable, reading anyway: {err}");
    }

    log::debug!(
        "reading DHT22 on GPIO {} with up to {} retries",
        args.pin,
        args.retries
    );

    match rpi::read(args.pin, args.retries) {
        Ok(reading) => {
            println!("Relative humidity: {:.1} %", reading.humidity);
            println!("Temperature: {:.1} C", reading.temperature);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            let code = match err {
                ReadError::Driver(_) => EXIT_DRIVER,
                ReadError::Sensor(DhtError::ChecksumMismatch) => EXIT_CHECKSUM,
                ReadError::Sensor(DhtError::Timeout(_)) => EXIT_TIMEOUT,
                ReadError::Sensor(DhtError::PinError(_)) => EXIT_DRIVER,
            };
            ExitCode::from(code)
        }
    }
}
