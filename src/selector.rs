//! Random tune selection.

use core::convert::Infallible;

use embedded_hal::{
    adc::{Channel, OneShot},
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::OutputPin,
};
use rand_core::{RngCore, SeedableRng};

use crate::{
    audio::Speaker,
    fmt::{info, warning},
    melody::Melody,
};

/// Seed used when the noise sample cannot be read.
pub const FALLBACK_SEED: u64 = 0x5eed_0f_7a1e;

/// Take one conversion from a floating analog input to seed the generator.
///
/// Blocks until the conversion completes. A failed conversion yields
/// [`FALLBACK_SEED`], so the firmware still plays, just predictably.
pub fn sample_seed<ADC, A, P>(adc: &mut A, pin: &mut P) -> u64
where
    A: OneShot<ADC, u16, P>,
    P: Channel<ADC>,
{
    match nb::block!(adc.read(pin)) {
        Ok(sample) => u64::from(sample),
        Err(_) => {
            warning!("noise sample failed, using fallback seed");
            FALLBACK_SEED
        }
    }
}

/// Picks one tune per press from a fixed catalog.
///
/// The generator is seeded when the selector is built and is only ever
/// advanced by [`Selector::select`], one draw per call.
pub struct Selector<R> {
    rng: R,
    catalog: &'static [&'static Melody],
}

impl<R> Selector<R>
where
    R: RngCore,
{
    /// Select from `catalog` using an already seeded generator.
    pub fn new(rng: R, catalog: &'static [&'static Melody]) -> Self {
        Self { rng, catalog }
    }

    /// Seed a fresh generator from `seed`.
    pub fn seeded(seed: u64, catalog: &'static [&'static Melody]) -> Self
    where
        R: SeedableRng,
    {
        info!("seeding tune selector with {=u64}", seed);
        Self::new(R::seed_from_u64(seed), catalog)
    }

    /// The tunes being chosen from.
    pub fn catalog(&self) -> &'static [&'static Melody] {
        self.catalog
    }

    /// The generator, for inspection.
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Draw once and pick the matching tune, or `None` for an empty catalog.
    pub fn select(&mut self) -> Option<&'static Melody> {
        if self.catalog.is_empty() {
            return None;
        }
        let index = self.rng.next_u32() as usize % self.catalog.len();
        Some(self.catalog[index])
    }

    /// Pick a tune and play it to completion.
    pub fn select_and_play<P, D>(
        &mut self,
        speaker: &mut Speaker<P>,
        delay: &mut D,
    ) -> Option<&'static Melody>
    where
        P: OutputPin<Error = Infallible>,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        let melody = self.select()?;
        info!("selected {=str}", melody.name);
        melody.play(speaker, delay);
        Some(melody)
    }
}
