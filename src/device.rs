//! CYWM6935 Register Interface
//!
//! This module provides the register-level interface to the CYWM6935 through an SPI
//! device. Every access is one SPI transaction, so chip-select is asserted for exactly
//! one address byte and one data byte and released afterwards by the [`SpiDevice`]
//! implementation, on success and on failure alike.
//!
//! Registers can be accessed either by name through [`RegisterAddress`] with raw byte
//! values, or through the typed register definitions in [`crate::registers`].
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use cywm6935::{Device, Error, registers::{Channel, RegisterAddress}};
//!
//! fn tune<SPI: SpiDevice>(spi: SPI) -> Result<u8, Error> {
//!     let mut device = Device::new(spi);
//!
//!     device.write_register(Channel { channel: 42 })?;
//!     Ok(device.read(RegisterAddress::Channel)?)
//! }
//! ```
//!
//! [`SpiDevice`]: embedded_hal::spi::SpiDevice

use core::convert::Infallible;

use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{errors::Error as RegifaceError, ReadableRegister, WritableRegister};

use crate::registers::{RegisterAddress, READ_MASK, WRITE_FLAG};

/// Register interface for the CYWM6935 radio.
///
/// This struct wraps an SPI device and provides methods to read and write the radio's
/// single-byte registers.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI device.
    ///
    /// # Arguments
    /// * `spi` - An SPI device owning the radio's chip-select line
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Reads the raw value of a named register.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn read(&mut self, register: RegisterAddress) -> Result<u8, RegifaceError> {
        self.transfer_read(register.addr())
    }

    /// Writes a raw value to a named register.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write(&mut self, register: RegisterAddress, value: u8) -> Result<(), RegifaceError> {
        self.transfer_write(register.addr(), value)
    }

    /// Reads a typed register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Single-byte register type implementing ReadableRegister with u8 ID
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u8, Array = [u8; 1]>,
    {
        let value = self.transfer_read(R::id())?;

        R::from_bytes([value]).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Writes a typed value to a device register.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u8, Error = Infallible, Array = [u8; 1]>,
    {
        let [value] = match register.to_bytes() {
            Ok(bytes) => bytes,
            Err(never) => match never {},
        };

        self.transfer_write(R::id(), value)
    }

    /// Address byte with the write flag clear, then a dummy byte whose echo is the value.
    fn transfer_read(&mut self, address: u8) -> Result<u8, RegifaceError> {
        let mut value = [0x00];

        self.spi
            .transaction(&mut [
                Operation::Write(&[address & READ_MASK]),
                Operation::TransferInPlace(&mut value),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        Ok(value[0])
    }

    fn transfer_write(&mut self, address: u8, value: u8) -> Result<(), RegifaceError> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[address | WRITE_FLAG]),
                Operation::Write(&[value]),
            ])
            .map_err(|_| RegifaceError::BusError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{Control, Rssi};
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    struct FailingSpi;

    impl ErrorType for FailingSpi {
        type Error = ErrorKind;
    }

    impl SpiDevice for FailingSpi {
        fn transaction(&mut self, _: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn read_clocks_out_dummy_byte() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write(0x22),
            SpiTransaction::transfer_in_place(vec![0x00], vec![0x35]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        assert_eq!(device.read(RegisterAddress::Rssi).unwrap(), 0x35);

        device.release().done();
    }

    #[test]
    fn write_sets_write_flag() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write(0xA1),
            SpiTransaction::write(0x2A),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        device.write(RegisterAddress::Channel, 0x2A).unwrap();

        device.release().done();
    }

    #[test]
    fn typed_register_access() {
        let expectations = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write(0x83),
            SpiTransaction::write(0x80),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            SpiTransaction::write(0x22),
            SpiTransaction::transfer_in_place(vec![0x00], vec![0xE7]),
            SpiTransaction::transaction_end(),
        ];
        let mut device = Device::new(SpiMock::new(&expectations));

        device.write_register(Control::receive()).unwrap();
        let rssi: Rssi = device.read_register().unwrap();

        assert_eq!(
            rssi,
            Rssi {
                valid: true,
                magnitude: 7
            }
        );

        device.release().done();
    }

    #[test]
    fn bus_failure_is_reported() {
        let mut device = Device::new(FailingSpi);

        assert!(matches!(
            device.read(RegisterAddress::Rssi),
            Err(RegifaceError::BusError)
        ));
        assert!(matches!(
            device.write(RegisterAddress::Control, 0x00),
            Err(RegifaceError::BusError)
        ));
    }
}
