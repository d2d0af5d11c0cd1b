#![cfg_attr(not(test), no_std)]
//! CYWM6935 RSSI Driver
//!
//! This crate measures received signal strength with the Cypress CYWM6935 (WirelessUSB LR)
//! 2.4 GHz radio module. It covers exactly what is needed for clear channel assessment and
//! spectrum scanning: chip bring-up, channel selection and RSSI acquisition.
//!
//! # Features
//! - Channels of 1 MHz from 2400 MHz upwards
//! - RSSI magnitude from 0 (quiet) to 31 (strong signal)
//! - Instantaneous, peak-of-N and average-of-N measurements
//! - Multi-channel sweeps
//! - Pluggable strategy for waiting on valid readings
//!
//! # Architecture
//! - [`radio`]: The [`Cywm6935`] driver implementing init and the measurement sequence
//! - [`device`]: Register access over an `embedded-hal` SPI device
//! - [`registers`]: Register addresses and typed register definitions
//! - [`poll`]: Strategies deciding how long to wait for a valid reading
//!
//! # Usage
//! 1. Create the driver with an SPI device (owning chip-select), the reset pin and a delay
//! 2. Call [`Cywm6935::init`] once
//! 3. Measure with [`Cywm6935::rssi`], [`Cywm6935::rssi_peak`] or [`Cywm6935::rssi_average`]
//!
//! # Important Notes
//! - The default [`Unbounded`] strategy retries until the chip reports a valid reading,
//!   which never returns on faulty hardware. Use [`Bounded`] to fail with
//!   [`Error::ReadingTimeout`] instead.
//! - Channels are not range checked.
//! - The driver holds no measurement state; the receiver is off between calls.
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
//! use cywm6935::{Bounded, Cywm6935, Error};
//!
//! fn noise_floor<SPI, RESET, DELAY>(spi: SPI, reset: RESET, delay: DELAY) -> Result<u8, Error>
//! where
//!     SPI: SpiDevice,
//!     RESET: OutputPin,
//!     DELAY: DelayNs,
//! {
//!     let mut radio = Cywm6935::with_poll_strategy(spi, reset, delay, Bounded::new(100));
//!     radio.init()?;
//!
//!     // Average of 20 readings on 2442 MHz
//!     radio.rssi_average(42, 20)
//! }
//! ```

pub mod device;
mod error;
pub mod poll;
pub mod radio;
pub mod registers;

pub use device::Device;
pub use error::Error;
pub use poll::{Bounded, PollStrategy, Unbounded};
pub use radio::{ChannelActivity, Cywm6935};
