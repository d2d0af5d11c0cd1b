//! System-related registers
//!
//! This module contains the analog, clock and synthesizer registers written once during
//! chip bring-up. Their bit fields are undocumented beyond the values recommended by the
//! vendor, so each register simply wraps its raw byte.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Analog control register (address: 0x20)
///
/// Written twice during init: first with 0x01 to reset the analog stage, which then
/// needs 50µs to settle, and later with 0x44 once the clocks are configured.
#[register(0x20u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogCtl(pub u8);

/// Clock manual register (address: 0x32)
#[register(0x32u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockManual(pub u8);

/// Clock enable register (address: 0x33)
#[register(0x33u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockEnable(pub u8);

/// Crystal adjust register (address: 0x24)
///
/// 0x40 disables the clock output pin.
#[register(0x24u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CrystalAdj(pub u8);

/// VCO calibration register (address: 0x26)
///
/// 0xC0 selects the +5/-5 calibration adjust recommended for RSSI scanning.
#[register(0x26u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VcoCal(pub u8);

/// Synthesizer lock count register (address: 0x38)
#[register(0x38u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynLockCnt(pub u8);

impl FromByteArray for AnalogCtl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for AnalogCtl {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}

impl FromByteArray for ClockManual {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for ClockManual {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}

impl FromByteArray for ClockEnable {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for ClockEnable {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}

impl FromByteArray for CrystalAdj {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for CrystalAdj {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}

impl FromByteArray for VcoCal {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for VcoCal {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}

impl FromByteArray for SynLockCnt {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(bytes[0]))
    }
}

impl ToByteArray for SynLockCnt {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.0])
    }
}
