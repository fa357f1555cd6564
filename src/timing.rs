//! Busy-wait timing base.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use fugit::HertzU32;

/// Busy-wait delay calibrated against the system clock.
///
/// Nothing here relies on interrupts or timer peripherals: every wait is a
/// counted spin, so the delay stays accurate while interrupts are masked.
#[derive(Clone, Copy, Debug)]
pub struct SpinDelay {
    cycles_per_us: u32,
}

impl SpinDelay {
    /// Create a delay for a core running at `sysclk`.
    pub fn new(sysclk: HertzU32) -> Self {
        Self {
            cycles_per_us: (sysclk.to_Hz() / 1_000_000).max(1),
        }
    }

    /// Core cycles spent per microsecond.
    pub fn cycles_per_us(&self) -> u32 {
        self.cycles_per_us
    }

    /// Wait for roughly `us` microseconds.
    pub fn delay_microseconds(&mut self, us: u32) {
        spin(spin_cycles(us, self.cycles_per_us));
    }

    /// Wait for roughly `ms` milliseconds.
    pub fn delay_milliseconds(&mut self, ms: u32) {
        let per_ms = self.cycles_per_us.saturating_mul(1_000);
        for _ in 0..ms {
            spin(per_ms);
        }
    }
}

/// Number of cycles to spin for a `us` microsecond wait.
///
/// The first microsecond goes to call and pin-toggle overhead, so waits of
/// zero or one microsecond spin for nothing at all.
pub const fn spin_cycles(us: u32, cycles_per_us: u32) -> u32 {
    us.saturating_sub(1).saturating_mul(cycles_per_us)
}

#[cfg(feature = "rp2040")]
fn spin(cycles: u32) {
    if cycles > 0 {
        cortex_m::asm::delay(cycles);
    }
}

#[cfg(not(feature = "rp2040"))]
fn spin(cycles: u32) {
    for _ in 0..cycles {
        core::hint::spin_loop();
    }
}

impl DelayUs<u32> for SpinDelay {
    fn delay_us(&mut self, us: u32) {
        self.delay_microseconds(us);
    }
}

impl DelayMs<u32> for SpinDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.delay_milliseconds(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugit::RateExtU32;

    #[test]
    fn calibrates_from_system_clock() {
        assert_eq!(SpinDelay::new(125.MHz()).cycles_per_us(), 125);
        assert_eq!(SpinDelay::new(16.MHz()).cycles_per_us(), 16);
        // A sub-MHz clock still spins at least one cycle per microsecond.
        assert_eq!(SpinDelay::new(32_768.Hz()).cycles_per_us(), 1);
    }

    #[test]
    fn tiny_waits_are_no_ops() {
        assert_eq!(spin_cycles(0, 125), 0);
        assert_eq!(spin_cycles(1, 125), 0);
        assert_eq!(spin_cycles(2, 125), 125);
    }

    #[test]
    fn long_waits_saturate_instead_of_wrapping() {
        assert_eq!(spin_cycles(u32::MAX, 125), u32::MAX);
    }

    #[test]
    fn cycles_grow_monotonically() {
        let mut last = 0;
        for us in 0..2_000 {
            let cycles = spin_cycles(us, 16);
            assert!(cycles >= last);
            last = cycles;
        }
    }

    #[test]
    fn zero_waits_return() {
        let mut delay = SpinDelay::new(125.MHz());
        delay.delay_us(0);
        delay.delay_us(1);
        delay.delay_ms(0);
    }
}
