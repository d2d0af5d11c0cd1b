//! Register definitions for the CYWM6935 radio
//! Addresses taken from the CYWUSB6935 datasheet
//!
//! Only the registers needed for RSSI measurement are modelled. Every register on this
//! chip is a single byte; the address occupies bits 5:0 of the first SPI byte, bit 7
//! selects a write and bit 6 enables burst mode (never used here).

mod rf;
mod system;

pub use rf::*;
pub use system::*;

/// Write flag OR'ed into the address byte of a write transaction
pub(crate) const WRITE_FLAG: u8 = 0x80;

/// Mask applied to the address byte of a read transaction
pub(crate) const READ_MASK: u8 = 0x7F;

/// Named register addresses
///
/// This is the closed set of registers the driver is allowed to touch. Raw register
/// access through [`Device::read`](crate::Device::read) and
/// [`Device::write`](crate::Device::write) only accepts these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterAddress {
    /// Transceiver control (0x03)
    Control,
    /// Analog control (0x20)
    AnalogCtl,
    /// Channel select (0x21)
    Channel,
    /// Received signal strength (0x22)
    Rssi,
    /// Crystal adjust (0x24)
    CrystalAdj,
    /// VCO calibration (0x26)
    VcoCal,
    /// Carrier detect override (0x2F)
    CarrierDetect,
    /// Clock manual (0x32)
    ClockManual,
    /// Clock enable (0x33)
    ClockEnable,
    /// Synthesizer lock count (0x38)
    SynLockCnt,
}

impl RegisterAddress {
    /// Returns the on-chip address of the register
    pub const fn addr(self) -> u8 {
        match self {
            Self::Control => 0x03,
            Self::AnalogCtl => 0x20,
            Self::Channel => 0x21,
            Self::Rssi => 0x22,
            Self::CrystalAdj => 0x24,
            Self::VcoCal => 0x26,
            Self::CarrierDetect => 0x2F,
            Self::ClockManual => 0x32,
            Self::ClockEnable => 0x33,
            Self::SynLockCnt => 0x38,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regiface::ReadableRegister;

    fn id_of<R: ReadableRegister<IdType = u8>>() -> u8 {
        R::id()
    }

    #[test]
    fn typed_registers_match_named_addresses() {
        assert_eq!(id_of::<Control>(), RegisterAddress::Control.addr());
        assert_eq!(id_of::<AnalogCtl>(), RegisterAddress::AnalogCtl.addr());
        assert_eq!(id_of::<Channel>(), RegisterAddress::Channel.addr());
        assert_eq!(id_of::<Rssi>(), RegisterAddress::Rssi.addr());
        assert_eq!(id_of::<CrystalAdj>(), RegisterAddress::CrystalAdj.addr());
        assert_eq!(id_of::<VcoCal>(), RegisterAddress::VcoCal.addr());
        assert_eq!(id_of::<CarrierDetect>(), RegisterAddress::CarrierDetect.addr());
        assert_eq!(id_of::<ClockManual>(), RegisterAddress::ClockManual.addr());
        assert_eq!(id_of::<ClockEnable>(), RegisterAddress::ClockEnable.addr());
        assert_eq!(id_of::<SynLockCnt>(), RegisterAddress::SynLockCnt.addr());
    }

    #[test]
    fn addresses_fit_in_six_bits() {
        for reg in [
            RegisterAddress::Control,
            RegisterAddress::AnalogCtl,
            RegisterAddress::Channel,
            RegisterAddress::Rssi,
            RegisterAddress::CrystalAdj,
            RegisterAddress::VcoCal,
            RegisterAddress::CarrierDetect,
            RegisterAddress::ClockManual,
            RegisterAddress::ClockEnable,
            RegisterAddress::SynLockCnt,
        ] {
            assert_eq!(reg.addr() & !0x3F, 0);
        }
    }
}
