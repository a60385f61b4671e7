//! DHT22 driver decoding the sensor's one-wire protocol by pulse counting.
//!
//! The DHT22 (AM2302) transmits 40 bits over a single GPIO line, encoding
//! each bit in how long it holds the line high. This crate measures those
//! pulses without a hardware timer: a tight polling loop counts iterations
//! ("cycles") per line level, and a bit is decoded by comparing the high
//! phase against the low phase of the same bit. The comparison is relative,
//! so the decoding works at any host clock speed.
//!
//! The core driver is platform-agnostic and built on the [`embedded-hal`]
//! traits, with retry-with-cooldown handling for the line noise that
//! bit-banged reads inevitably hit.
//!
//! # Features
//! - `defmt`: Implements `defmt::Format` on public value types
//! - `std`: `std::error::Error` for the error types
//! - `rt`: best-effort `SCHED_FIFO` elevation and page locking (Linux)
//! - `rpi`: Raspberry Pi GPIO backend via `rppal` and a ready-made
//!   [`rpi::read`] entry point
//! - `cli`: the `dht22-cli` binary
//! - `ffi`: a C ABI `dht22_read` export
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod dht22;
pub mod error;
pub mod frame;
pub mod pulse;

#[cfg(feature = "ffi")]
pub mod ffi;
#[cfg(feature = "rpi")]
pub mod rpi;
#[cfg(feature = "rt")]
pub mod rt;

pub use dht22::Dht22;
pub use error::{DhtError, TimeoutKind};
pub use frame::{RawFrame, Reading};
