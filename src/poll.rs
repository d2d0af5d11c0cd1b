//! Validity polling strategies
//!
//! While sampling, the driver reads the RSSI register until the chip flags the reading
//! as valid. Each time the flag is clear the driver runs a forcing cycle (set the
//! carrier detect override, wait for one ADC conversion, read again, clear the
//! override). A [`PollStrategy`] decides whether another forcing cycle may be issued.
//!
//! [`Unbounded`] keeps forcing until the chip answers, matching the vendor application
//! note; a chip that never sets the valid bit blocks the caller forever. [`Bounded`]
//! gives up after a fixed number of cycles per sample and the driver reports
//! [`Error::ReadingTimeout`](crate::Error::ReadingTimeout).

/// Decides how long to wait for a valid RSSI reading.
pub trait PollStrategy {
    /// Called once before the first read of every sample.
    fn start(&mut self);

    /// Called before each forcing cycle. Returning `false` abandons the sample.
    fn may_force(&mut self) -> bool;
}

/// Retries forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Unbounded;

impl PollStrategy for Unbounded {
    fn start(&mut self) {}

    fn may_force(&mut self) -> bool {
        true
    }
}

/// Allows at most `max_cycles` forcing cycles per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounded {
    max_cycles: u32,
    remaining: u32,
}

impl Bounded {
    /// Creates a strategy allowing `max_cycles` forcing cycles per sample
    pub const fn new(max_cycles: u32) -> Self {
        Self {
            max_cycles,
            remaining: max_cycles,
        }
    }

    /// Maximum number of forcing cycles per sample
    pub const fn max_cycles(&self) -> u32 {
        self.max_cycles
    }
}

impl PollStrategy for Bounded {
    fn start(&mut self) {
        self.remaining = self.max_cycles;
    }

    fn may_force(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_gives_up() {
        let mut poll = Unbounded;
        poll.start();
        assert!((0..10_000).all(|_| poll.may_force()));
    }

    #[test]
    fn bounded_allows_exactly_max_cycles() {
        let mut poll = Bounded::new(3);
        poll.start();
        assert!(poll.may_force());
        assert!(poll.may_force());
        assert!(poll.may_force());
        assert!(!poll.may_force());
        assert!(!poll.may_force());
    }

    #[test]
    fn bounded_budget_resets_per_sample() {
        let mut poll = Bounded::new(1);
        poll.start();
        assert!(poll.may_force());
        assert!(!poll.may_force());

        poll.start();
        assert!(poll.may_force());
        assert_eq!(poll.max_cycles(), 1);
    }

    #[test]
    fn bounded_zero_never_forces() {
        let mut poll = Bounded::new(0);
        poll.start();
        assert!(!poll.may_force());
    }
}
