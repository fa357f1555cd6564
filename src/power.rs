//! Standby between presses.

use crate::input::PendingEvent;

/// Low-power wait that only the button interrupt ends.
pub trait Standby {
    /// Park the core until an interrupt arrives, unless `pending` is already
    /// raised, in which case return at once.
    fn standby(&mut self, pending: &PendingEvent);
}

/// Cortex-M deep sleep through `wfi`.
///
/// Interrupts are masked while the flag is checked, so an edge that lands
/// between the check and `wfi` still wakes the core: a pending interrupt ends
/// `wfi` even while masked, and is serviced as soon as the mask is lifted.
#[cfg(feature = "rp2040")]
pub struct Wfi {
    _private: (),
}

#[cfg(feature = "rp2040")]
impl Wfi {
    /// Select deep sleep for every later `wfi`.
    pub fn new(scb: &mut cortex_m::peripheral::SCB) -> Self {
        scb.set_sleepdeep();
        Self { _private: () }
    }
}

#[cfg(feature = "rp2040")]
impl Standby for Wfi {
    fn standby(&mut self, pending: &PendingEvent) {
        cortex_m::interrupt::disable();
        if !pending.is_pending() {
            cortex_m::asm::wfi();
        }
        // SAFETY: the main loop owns no critical section here, so lifting
        // the mask cannot break one.
        unsafe { cortex_m::interrupt::enable() };
    }
}
