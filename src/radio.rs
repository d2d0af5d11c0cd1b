//! RSSI measurement driver
//!
//! [`Cywm6935`] brings the chip up and measures received signal strength on a channel.
//! Every measurement follows the same sequence:
//!
//! 1. Select the channel and turn the receiver on
//! 2. Wait 285µs for the synthesizer, receiver and first ADC conversion
//! 3. Clear the carrier detect override
//! 4. Take one or more samples, forcing conversions while the reading is invalid
//! 5. Turn the receiver off
//!
//! The receiver is off again whenever a measurement returns, so no state carries over
//! between calls.

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    device::Device,
    poll::{PollStrategy, Unbounded},
    registers::{
        AnalogCtl, CarrierDetect, Channel, ClockEnable, ClockManual, Control, CrystalAdj,
        RegisterAddress, Rssi, SynLockCnt, VcoCal,
    },
    Error,
};

/// Time the chip needs after reset is released
pub const RESET_RECOVERY_MS: u32 = 1;
/// Settle time of the analog stage after it is reset during init
pub const ANALOG_SETTLE_US: u32 = 50;
/// Synthesizer settle time after a channel change
pub const SYNTH_SETTLE_US: u32 = 200;
/// Receiver start-up time
pub const RECEIVER_READY_US: u32 = 35;
/// Duration of one RSSI ADC conversion
pub const RSSI_CONVERSION_US: u32 = 50;
/// Wait between turning the receiver on and the first RSSI read
pub const RECEIVER_WARMUP_US: u32 = SYNTH_SETTLE_US + RECEIVER_READY_US + RSSI_CONVERSION_US;

/// Channel occupancy derived from an RSSI magnitude
///
/// Thresholds follow the Cypress application note on clear channel assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelActivity {
    /// 0-10: relatively quiet
    Quiet,
    /// 11-28: probably in use
    Occupied,
    /// 29-31: strong signal present
    Strong,
}

impl ChannelActivity {
    /// Classifies an RSSI magnitude
    pub const fn from_magnitude(magnitude: u8) -> Self {
        match magnitude {
            0..=10 => Self::Quiet,
            11..=28 => Self::Occupied,
            _ => Self::Strong,
        }
    }
}

/// Driver for the CYWM6935
///
/// Chip-select is owned by the SPI device, so sharing one bus between several drivers
/// is a matter of choosing an appropriate [`SpiDevice`] implementation.
pub struct Cywm6935<SPI, RESET, DELAY, POLL = Unbounded> {
    device: Device<SPI>,
    reset: RESET,
    delay: DELAY,
    poll: POLL,
}

impl<SPI, RESET, DELAY> Cywm6935<SPI, RESET, DELAY> {
    /// Creates a driver that waits indefinitely for valid RSSI readings.
    ///
    /// The chip is not touched until [`init`](Cywm6935::init) is called.
    pub fn new(spi: SPI, reset: RESET, delay: DELAY) -> Self {
        Self::with_poll_strategy(spi, reset, delay, Unbounded)
    }
}

impl<SPI, RESET, DELAY, POLL> Cywm6935<SPI, RESET, DELAY, POLL> {
    /// Creates a driver using `poll` to bound the wait for valid RSSI readings.
    pub fn with_poll_strategy(spi: SPI, reset: RESET, delay: DELAY, poll: POLL) -> Self {
        Self {
            device: Device::new(spi),
            reset,
            delay,
            poll,
        }
    }

    /// Releases the SPI device, reset pin, delay and poll strategy
    pub fn release(self) -> (SPI, RESET, DELAY, POLL) {
        (self.device.release(), self.reset, self.delay, self.poll)
    }
}

impl<SPI, RESET, DELAY, POLL> Cywm6935<SPI, RESET, DELAY, POLL>
where
    SPI: SpiDevice,
    RESET: OutputPin,
    DELAY: DelayNs,
    POLL: PollStrategy,
{
    /// Brings the chip out of reset and loads the RSSI scanning configuration.
    ///
    /// Must be called once before any measurement. The register writes are consumed by
    /// the chip in order and must not be rearranged.
    pub fn init(&mut self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("init()");
        // Reset is active low
        self.reset.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_ms(RESET_RECOVERY_MS);

        self.device.write_register(AnalogCtl(0x01))?;
        self.delay.delay_us(ANALOG_SETTLE_US);
        self.device.write_register(ClockManual(0x41))?;
        self.device.write_register(ClockEnable(0x41))?;
        self.device.write_register(AnalogCtl(0x44))?;
        self.device.write_register(CrystalAdj(0x40))?;
        self.device.write_register(VcoCal(0xC0))?;
        self.device.write_register(SynLockCnt(0xFF))?;
        Ok(())
    }

    /// Reads the raw value of a register
    pub fn read(&mut self, register: RegisterAddress) -> Result<u8, Error> {
        Ok(self.device.read(register)?)
    }

    /// Writes a raw value to a register
    pub fn write(&mut self, register: RegisterAddress, value: u8) -> Result<(), Error> {
        Ok(self.device.write(register, value)?)
    }

    /// Returns an instantaneous RSSI reading (0-31) for `channel`.
    pub fn rssi(&mut self, channel: u8) -> Result<u8, Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("rssi({})", channel);
        self.measure(channel, 1, 0, |_, sample| sample)
    }

    /// Returns the highest of `count` RSSI readings (0-31) for `channel`.
    ///
    /// A `count` of zero takes no samples and returns 0.
    pub fn rssi_peak(&mut self, channel: u8, count: u8) -> Result<u8, Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("rssi_peak({}, {})", channel, count);
        self.measure(channel, count, 0, u8::max)
    }

    /// Returns the mean of `count` RSSI readings (0-31) for `channel`, rounded down.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `count` is zero; nothing is sent to the chip
    pub fn rssi_average(&mut self, channel: u8, count: u8) -> Result<u8, Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("rssi_average({}, {})", channel, count);
        if count == 0 {
            return Err(Error::InvalidArgument);
        }

        let sum = self.measure(channel, count, 0u16, |sum, sample| sum + u16::from(sample))?;
        // At most 31, the quotient always fits
        Ok((sum / u16::from(count)) as u8)
    }

    /// Measures consecutive channels starting at `first_channel`, storing the average of
    /// `count` readings for each channel in the corresponding slot of `readings`.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `count` is zero or the sweep runs past channel 255;
    ///   nothing is sent to the chip
    pub fn sweep(&mut self, first_channel: u8, count: u8, readings: &mut [u8]) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("sweep({}, {}, {})", first_channel, count, readings.len());
        if count == 0 || usize::from(first_channel) + readings.len() > 256 {
            return Err(Error::InvalidArgument);
        }

        for (channel, slot) in (first_channel..=u8::MAX).zip(readings.iter_mut()) {
            *slot = self.rssi_average(channel, count)?;
        }
        Ok(())
    }

    /// Returns `true` when the average of `count` readings classifies as
    /// [`ChannelActivity::Quiet`].
    pub fn is_channel_clear(&mut self, channel: u8, count: u8) -> Result<bool, Error> {
        let average = self.rssi_average(channel, count)?;
        Ok(ChannelActivity::from_magnitude(average) == ChannelActivity::Quiet)
    }

    /// Runs one measurement, folding `count` samples into `init`.
    fn measure<A>(
        &mut self,
        channel: u8,
        count: u8,
        init: A,
        mut fold: impl FnMut(A, u8) -> A,
    ) -> Result<A, Error> {
        self.device.write_register(Channel { channel })?;
        self.device.write_register(Control::receive())?;
        self.delay.delay_us(RECEIVER_WARMUP_US);
        self.device.write_register(CarrierDetect::released())?;

        let result = (0..count).try_fold(init, |acc, _| self.sample().map(|s| fold(acc, s)));
        if let Err(Error::Bus) = result {
            return result;
        }

        // Leave the receiver off even when a sample timed out
        let off = self.device.write_register(Control::off());
        let value = result?;
        off?;
        Ok(value)
    }

    /// Reads the RSSI register until the chip marks the reading valid.
    fn sample(&mut self) -> Result<u8, Error> {
        self.poll.start();
        let mut rssi: Rssi = self.device.read_register()?;

        while !rssi.valid {
            if !self.poll.may_force() {
                #[cfg(feature = "defmt")]
                defmt::debug!("no valid RSSI reading, giving up");
                return Err(Error::ReadingTimeout);
            }

            #[cfg(feature = "defmt")]
            defmt::debug!("RSSI invalid, forcing conversion");
            self.device.write_register(CarrierDetect::forced())?;
            self.delay.delay_us(RSSI_CONVERSION_US);
            rssi = self.device.read_register()?;
            self.device.write_register(CarrierDetect::released())?;
        }

        Ok(rssi.magnitude)
    }
}
