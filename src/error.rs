//! Driver error type

use regiface::errors::Error as RegifaceError;

/// Errors returned by the RSSI driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SPI device reported a failure
    Bus,
    /// The reset line could not be driven
    Pin,
    /// The poll strategy gave up before the chip reported a valid RSSI reading
    ReadingTimeout,
    /// An argument was outside the accepted range (e.g. a zero sample count for averaging)
    InvalidArgument,
}

impl From<RegifaceError> for Error {
    fn from(_: RegifaceError) -> Self {
        // Registers on this chip are single raw bytes, so every register-layer
        // failure originates on the bus.
        Self::Bus
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus => f.write_str("SPI bus error"),
            Self::Pin => f.write_str("reset pin error"),
            Self::ReadingTimeout => f.write_str("timed out waiting for a valid RSSI reading"),
            Self::InvalidArgument => f.write_str("invalid argument"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_errors_map_to_bus() {
        assert_eq!(Error::from(RegifaceError::BusError), Error::Bus);
        assert_eq!(Error::from(RegifaceError::DeserializationError), Error::Bus);
    }
}
