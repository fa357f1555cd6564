//! Square-wave tone synthesis on a plain output pin.

use core::convert::Infallible;

use embedded_hal::{blocking::delay::DelayUs, digital::v2::OutputPin};

use crate::fmt::{infallible, trace};

/// Module containing musical note declarations, in whole hertz.
pub mod music {
    /// 4th octave C note
    pub const C4: u32 = 261;
    /// 4th octave D note
    pub const D4: u32 = 294;
    /// 4th octave E note
    pub const E4: u32 = 329;
    /// 4th octave F note
    pub const F4: u32 = 349;
    /// 4th octave G note
    pub const G4: u32 = 391;
    /// 4th octave G sharp note
    pub const GS4: u32 = 415;
    /// 4th octave A note
    pub const A4: u32 = 440;
    /// 4th octave B flat note
    pub const BB4: u32 = 466;
    /// 5th octave C note
    pub const C5: u32 = 523;
    /// 5th octave C sharp note
    pub const CS5: u32 = 554;
    /// 5th octave D note
    pub const D5: u32 = 587;
    /// 5th octave D sharp note
    pub const DS5: u32 = 622;
    /// 5th octave E note
    pub const E5: u32 = 659;
    /// 5th octave F note
    pub const F5: u32 = 698;
    /// 5th octave F sharp note
    pub const FS5: u32 = 740;
    /// 5th octave G note
    pub const G5: u32 = 784;
    /// 5th octave G sharp note
    pub const GS5: u32 = 830;
    /// 5th octave A note
    pub const A5: u32 = 880;
    /// Rest note
    pub const REST: u32 = 0;
}

/// Square-wave timing for one tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tone {
    /// Time the pin holds each level, in microseconds.
    pub half_period_us: u32,
    /// Number of high/low pairs to emit.
    pub cycles: u32,
}

impl Tone {
    /// A tone that emits nothing.
    pub const SILENT: Tone = Tone {
        half_period_us: 0,
        cycles: 0,
    };

    /// Compute the square wave for `hertz` held for `ms` milliseconds.
    ///
    /// The pin holds each level for `1_000_000 / hertz` microseconds, so one
    /// cycle lasts two of those. Both divisions truncate. A duration shorter
    /// than one cycle gives zero cycles, and a frequency of zero (or one so
    /// high that the half period truncates to zero) gives [`Tone::SILENT`].
    pub const fn new(hertz: u32, ms: u32) -> Self {
        if hertz == 0 {
            return Self::SILENT;
        }
        let half_period_us = 1_000_000 / hertz;
        if half_period_us == 0 {
            return Self::SILENT;
        }
        let cycles = (ms as u64 * 1_000) / (half_period_us as u64 * 2);
        Self {
            half_period_us,
            cycles: if cycles > u32::MAX as u64 {
                u32::MAX
            } else {
                cycles as u32
            },
        }
    }
}

/// Piezo speaker driven by toggling a plain output pin.
pub struct Speaker<P> {
    pin: P,
}

impl<P> Speaker<P>
where
    P: OutputPin<Error = Infallible>,
{
    /// Take ownership of the speaker pin and drive it low.
    pub fn new(mut pin: P) -> Self {
        infallible(pin.set_low());
        Self { pin }
    }

    /// Play `hertz` for `ms` milliseconds, blocking until the tone is done.
    ///
    /// # Arguments
    ///
    /// `delay` - Timing base for each half-cycle
    /// `hertz` - The tone's frequency; zero is silence
    /// `ms` - How long the tone lasts
    pub fn beep<D>(&mut self, delay: &mut D, hertz: u32, ms: u32) -> Tone
    where
        D: DelayUs<u32>,
    {
        let tone = Tone::new(hertz, ms);
        trace!("beep {=u32} Hz x {=u32} cycles", hertz, tone.cycles);
        for _ in 0..tone.cycles {
            infallible(self.pin.set_high());
            delay.delay_us(tone.half_period_us);
            infallible(self.pin.set_low());
            delay.delay_us(tone.half_period_us);
        }
        tone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Event, Log};
    use pretty_assertions::assert_eq;

    #[test]
    fn cycle_count_truncates_both_divisions() {
        for hertz in (1..20_000).step_by(37) {
            for ms in [1, 7, 10, 30, 100, 150, 333, 500, 1_000, 5_000] {
                let half = 1_000_000 / hertz;
                let expected = (ms * 1_000) / (half * 2);
                let tone = Tone::new(hertz, ms);
                assert_eq!(tone.half_period_us, half);
                assert_eq!(tone.cycles, expected, "{hertz} Hz for {ms} ms");
            }
        }
    }

    #[test]
    fn concert_a() {
        assert_eq!(
            Tone::new(440, 500),
            Tone {
                half_period_us: 2_272,
                cycles: 110,
            }
        );
    }

    #[test]
    fn shorter_than_one_cycle_is_silent() {
        // At 100 Hz each level lasts 10 ms, so a cycle takes 20 ms.
        assert_eq!(Tone::new(100, 10).cycles, 0);
        assert_eq!(Tone::new(100, 19).cycles, 0);
        assert_eq!(Tone::new(100, 20).cycles, 1);
    }

    #[test]
    fn zero_and_out_of_range_frequencies_are_silent() {
        assert_eq!(Tone::new(0, 500), Tone::SILENT);
        assert_eq!(Tone::new(1_000_001, 500), Tone::SILENT);
    }

    #[test]
    fn long_durations_do_not_overflow() {
        let tone = Tone::new(1, u32::MAX);
        assert_eq!(tone.half_period_us, 1_000_000);
        assert_eq!(tone.cycles, (u32::MAX as u64 * 1_000 / 2_000_000) as u32);
    }

    #[test]
    fn beep_toggles_with_equal_half_periods() {
        let log = Log::default();
        let mut speaker = Speaker::new(log.speaker());
        let mut delay = log.delay();
        log.clear();

        let tone = speaker.beep(&mut delay, 1_000, 6);

        assert_eq!(tone.cycles, 3);
        let pair = [
            Event::SpeakerHigh,
            Event::DelayUs(1_000),
            Event::SpeakerLow,
            Event::DelayUs(1_000),
        ];
        assert_eq!(log.events(), pair.repeat(3));
    }

    #[test]
    fn zero_duration_returns_immediately() {
        let log = Log::default();
        let mut speaker = Speaker::new(log.speaker());
        let mut delay = log.delay();
        log.clear();

        assert_eq!(speaker.beep(&mut delay, 440, 0).cycles, 0);
        assert_eq!(speaker.beep(&mut delay, 0, 250).cycles, 0);
        assert!(log.events().is_empty());
    }

    #[test]
    fn speaker_starts_low() {
        let log = Log::default();
        let _speaker = Speaker::new(log.speaker());
        assert_eq!(log.events(), vec![Event::SpeakerLow]);
    }
}
