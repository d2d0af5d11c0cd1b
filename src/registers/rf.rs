//! RF-related registers
//!
//! This module contains the registers used while measuring signal strength:
//! - Channel selection
//! - Receiver enable
//! - Carrier detect override
//! - Received signal strength indication

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Mask of the valid bit in the RSSI register
pub const RSSI_VALID: u8 = 0x20;

/// Mask of the signal strength bits in the RSSI register
pub const RSSI_MASK: u8 = 0x1F;

/// Channel register (address: 0x21)
///
/// Selects the 1 MHz sub-band the synthesizer tunes to. Channel `n` corresponds to
/// 2400 + n MHz. The valid range is defined by the chip; values are written as-is.
#[register(0x21u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel {
    /// Channel number
    pub channel: u8,
}

bitflags! {
    /// Transceiver control bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u8 {
        /// Receiver enable
        const RX_ENABLE = 0x80;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControlFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ControlFlags({=u8:#04x})", self.bits())
    }
}

/// Control register (address: 0x03)
///
/// Turns the receiver on and off. Only the receiver enable bit is used by this driver;
/// writing an empty flag set turns the transceiver off.
#[register(0x03u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control {
    /// Enabled control bits
    pub flags: ControlFlags,
}

impl Control {
    /// Receiver on
    pub const fn receive() -> Self {
        Self {
            flags: ControlFlags::RX_ENABLE,
        }
    }

    /// Transceiver off
    pub const fn off() -> Self {
        Self {
            flags: ControlFlags::empty(),
        }
    }
}

bitflags! {
    /// Carrier detect override bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CarrierDetectFlags: u8 {
        /// Force the carrier detect circuit on, starting an RSSI ADC conversion
        const OVERRIDE = 0x80;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CarrierDetectFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CarrierDetectFlags({=u8:#04x})", self.bits())
    }
}

/// Carrier detect register (address: 0x2F)
///
/// Setting the override bit starts an RSSI conversion even when no carrier has been
/// detected. The conversion takes 50µs, after which the override must be cleared again.
#[register(0x2Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CarrierDetect {
    /// Enabled override bits
    pub flags: CarrierDetectFlags,
}

impl CarrierDetect {
    /// Override set
    pub const fn forced() -> Self {
        Self {
            flags: CarrierDetectFlags::OVERRIDE,
        }
    }

    /// Override cleared
    pub const fn released() -> Self {
        Self {
            flags: CarrierDetectFlags::empty(),
        }
    }
}

/// RSSI register (address: 0x22)
///
/// Holds the result of the last RSSI conversion.
///
/// # Register Format
/// - Bits 7:6: Reserved
/// - Bit 5: Valid
/// - Bits 4:0: Signal strength, 0-31
///
/// A value of 0-10 indicates a relatively quiet channel, above 10 the channel is
/// probably in use and above 28 a strong signal is present.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rssi {
    /// The conversion finished and `magnitude` holds a usable value
    pub valid: bool,
    /// Signal strength, always within 0-31
    pub magnitude: u8,
}

impl Rssi {
    /// Decodes a raw register value
    pub const fn from_byte(value: u8) -> Self {
        Self {
            valid: value & RSSI_VALID != 0,
            magnitude: value & RSSI_MASK,
        }
    }
}

impl FromByteArray for Channel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { channel: bytes[0] })
    }
}

impl ToByteArray for Channel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.channel])
    }
}

impl FromByteArray for Control {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: ControlFlags::from_bits_truncate(bytes[0]),
        })
    }
}

impl ToByteArray for Control {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for CarrierDetect {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: CarrierDetectFlags::from_bits_truncate(bytes[0]),
        })
    }
}

impl ToByteArray for CarrierDetect {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for Rssi {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self::from_byte(bytes[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rssi_magnitude_is_masked() {
        for raw in 0..=u8::MAX {
            let rssi = Rssi::from_byte(raw);
            assert!(rssi.magnitude <= 31);
            assert_eq!(rssi.valid, raw & 0x20 != 0);
        }
    }

    #[test]
    fn rssi_ignores_reserved_bits() {
        assert_eq!(
            Rssi::from_byte(0xFF),
            Rssi {
                valid: true,
                magnitude: 31
            }
        );
        assert_eq!(
            Rssi::from_byte(0xC4),
            Rssi {
                valid: false,
                magnitude: 4
            }
        );
    }

    #[test]
    fn control_bytes() {
        assert_eq!(Control::receive().to_bytes(), Ok([0x80]));
        assert_eq!(Control::off().to_bytes(), Ok([0x00]));
    }

    #[test]
    fn carrier_detect_bytes() {
        assert_eq!(CarrierDetect::forced().to_bytes(), Ok([0x80]));
        assert_eq!(CarrierDetect::released().to_bytes(), Ok([0x00]));
    }
}
