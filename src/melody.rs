//! Notes, melodies and the melody player.

use core::convert::Infallible;

use embedded_hal::{
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::OutputPin,
};

use crate::{audio::music::REST, audio::Speaker, fmt::debug};

/// Silence after each note of a tune so repeated pitches stay distinct.
pub const NOTE_GAP_MS: u32 = 20;

/// A single pitch held for a fixed time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// Frequency in hertz, zero for a rest.
    pub hertz: u32,
    /// Duration in milliseconds.
    pub ms: u32,
}

impl Note {
    /// A note of `hertz` held for `ms` milliseconds.
    pub const fn new(hertz: u32, ms: u32) -> Self {
        Self { hertz, ms }
    }

    /// A silent pause of `ms` milliseconds.
    pub const fn rest(ms: u32) -> Self {
        Self { hertz: REST, ms }
    }

    /// Whether this note is a pause.
    pub const fn is_rest(&self) -> bool {
        self.hertz == REST
    }
}

/// An immutable tune: notes played front to back, each followed by `gap_ms`
/// of silence (the last one included).
#[derive(Debug, PartialEq, Eq)]
pub struct Melody {
    /// Short name for logs.
    pub name: &'static str,
    /// The notes, in playing order.
    pub notes: &'static [Note],
    /// Silence after every note.
    pub gap_ms: u32,
}

impl Melody {
    /// Play every note to completion. Nothing can cut playback short.
    pub fn play<P, D>(&self, speaker: &mut Speaker<P>, delay: &mut D)
    where
        P: OutputPin<Error = Infallible>,
        D: DelayUs<u32> + DelayMs<u32>,
    {
        debug!(
            "playing {=str} ({=usize} notes, {=u64} ms)",
            self.name,
            self.notes.len(),
            self.duration_ms()
        );
        for note in self.notes {
            if note.is_rest() {
                delay.delay_ms(note.ms);
            } else {
                speaker.beep(delay, note.hertz, note.ms);
            }
            if self.gap_ms > 0 {
                delay.delay_ms(self.gap_ms);
            }
        }
    }

    /// Total playing time in milliseconds, gaps included.
    pub fn duration_ms(&self) -> u64 {
        self.notes
            .iter()
            .map(|note| u64::from(note.ms) + u64::from(self.gap_ms))
            .sum()
    }
}

/// Number of steps in a glide from `from` toward `to`.
///
/// Each step multiplies the frequency by `percent / 100`, truncating. A glide
/// rises while below `to` when `percent > 100` and falls while above `to`
/// when `percent < 100`.
pub const fn glide_len(from: u32, to: u32, percent: u32) -> usize {
    let mut hertz = from;
    let mut len = 0;
    while (percent > 100 && hertz < to) || (percent < 100 && hertz > to) {
        len += 1;
        let next = hertz * percent / 100;
        if next == hertz {
            break;
        }
        hertz = next;
    }
    len
}

/// The notes of a glide, each lasting `ms`. Size the array with
/// [`glide_len`] using the same `from`, `to` and `percent`.
pub const fn glide<const N: usize>(from: u32, percent: u32, ms: u32) -> [Note; N] {
    let mut notes = [Note::rest(0); N];
    let mut hertz = from;
    let mut i = 0;
    while i < N {
        notes[i] = Note::new(hertz, ms);
        hertz = hertz * percent / 100;
        i += 1;
    }
    notes
}

/// Concatenate note slices into one array of exactly `N` notes.
pub const fn join<const N: usize>(parts: &[&[Note]]) -> [Note; N] {
    let mut notes = [Note::rest(0); N];
    let mut n = 0;
    let mut p = 0;
    while p < parts.len() {
        let part = parts[p];
        let mut i = 0;
        while i < part.len() {
            notes[n] = part[i];
            n += 1;
            i += 1;
        }
        p += 1;
    }
    assert!(n == N, "joined parts do not fill the array");
    notes
}
