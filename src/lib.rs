//! Push-button random tune player for a piezo speaker.
//!
//! A falling edge on the button line raises a [`PendingEvent`]; the main
//! loop debounces it, lights the status indicator, plays one tune picked at
//! random from a fixed catalog as a bit-banged square wave, and then puts the
//! core back into standby until the next press.
//!
//! The core is generic over `embedded-hal` pins and delays. The `rp2040`
//! feature adds the board layer and the firmware binary.
//!
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![cfg_attr(not(test), deny(warnings))]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
#![deny(rustdoc::broken_intra_doc_links)]

mod fmt;

pub mod audio;
#[cfg(feature = "rp2040")]
pub mod board;
pub mod catalog;
pub mod input;
pub mod melody;
pub mod power;
pub mod selector;
pub mod timing;

#[cfg(test)]
mod testing;

use core::convert::Infallible;

use embedded_hal::{
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::{InputPin, OutputPin},
};
use rand_core::RngCore;

pub use audio::{music, Speaker, Tone};
pub use input::{Button, Controller, Cycle, PendingEvent, State};
pub use melody::{Melody, Note};
pub use power::Standby;
pub use selector::Selector;
pub use timing::SpinDelay;

/// The whole device: the press controller plus the standby it falls back to.
pub struct Jukebox<B, L, S, D, R, W> {
    controller: Controller<B, L, S, D, R>,
    standby: W,
    pending: &'static PendingEvent,
}

impl<B, L, S, D, R, W> Jukebox<B, L, S, D, R, W>
where
    B: InputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
    S: OutputPin<Error = Infallible>,
    D: DelayUs<u32> + DelayMs<u32>,
    R: RngCore,
    W: Standby,
{
    /// Tie the controller to the flag its interrupt handler raises.
    pub fn new(
        controller: Controller<B, L, S, D, R>,
        standby: W,
        pending: &'static PendingEvent,
    ) -> Self {
        Self {
            controller,
            standby,
            pending,
        }
    }

    /// The press controller.
    pub fn controller(&self) -> &Controller<B, L, S, D, R> {
        &self.controller
    }

    /// Handle whatever is pending, then sleep if nothing new arrived.
    pub fn step(&mut self) -> Cycle {
        let cycle = self.controller.poll(self.pending);
        if !self.pending.is_pending() {
            self.standby.standby(self.pending);
        }
        cycle
    }

    /// Run forever.
    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }
}
