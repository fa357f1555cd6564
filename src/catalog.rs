//! The fixed set of tunes a button press picks from.
//!
//! The march and the droid chirps are note lists with a short gap after each
//! note; the two "voice" effects are continuous glides with no gap at all.

use crate::{
    audio::music::*,
    melody::{glide, glide_len, join, Melody, Note, NOTE_GAP_MS},
};

static MARCH_NOTES: [Note; 18] = [
    Note::new(A4, 500),
    Note::new(A4, 500),
    Note::new(A4, 500),
    Note::new(F4, 350),
    Note::new(C5, 150),
    Note::new(A4, 500),
    Note::new(F4, 350),
    Note::new(C5, 150),
    Note::new(A4, 1_000),
    Note::new(E5, 500),
    Note::new(E5, 500),
    Note::new(E5, 500),
    Note::new(F5, 350),
    Note::new(C5, 150),
    Note::new(GS4, 500),
    Note::new(F4, 350),
    Note::new(C5, 150),
    Note::new(A4, 1_000),
];

static R2D2_NOTES: [Note; 16] = [
    Note::new(A4, 100),
    Note::new(G4, 100),
    Note::new(E4, 100),
    Note::new(C4, 100),
    Note::new(D4, 100),
    Note::new(BB4, 100),
    Note::new(F4, 100),
    Note::new(C5, 100),
    Note::new(A4, 100),
    Note::new(G4, 100),
    Note::new(E4, 100),
    Note::new(C4, 100),
    Note::new(D4, 100),
    Note::new(BB4, 100),
    Note::new(F4, 100),
    Note::new(C5, 100),
];

const UH_LEN: usize = glide_len(1_000, 1_244, 101);
const OH_LEN: usize = glide_len(1_244, 1_108, 99);
const UH: [Note; UH_LEN] = glide(1_000, 101, 30);
const OH: [Note; OH_LEN] = glide(1_244, 99, 30);
static UHOH_NOTES: [Note; UH_LEN + 1 + OH_LEN] = join(&[&UH, &[Note::rest(200)], &OH]);

const RISE_LEN: usize = glide_len(1_000, 2_000, 102);
const FALL_LEN: usize = glide_len(2_000, 1_000, 98);
const RISE: [Note; RISE_LEN] = glide(1_000, 102, 10);
const FALL: [Note; FALL_LEN] = glide(2_000, 98, 10);
static OHHH_NOTES: [Note; RISE_LEN + FALL_LEN] = join(&[&RISE, &FALL]);

/// Opening bars of the Imperial March.
pub static MARCH: Melody = Melody {
    name: "march",
    notes: &MARCH_NOTES,
    gap_ms: NOTE_GAP_MS,
};

/// A burst of droid chirps.
pub static R2D2: Melody = Melody {
    name: "r2d2",
    notes: &R2D2_NOTES,
    gap_ms: NOTE_GAP_MS,
};

/// Rising then falling "uh-oh".
pub static UHOH: Melody = Melody {
    name: "uh-oh",
    notes: &UHOH_NOTES,
    gap_ms: 0,
};

/// Long rising and falling "ohhh".
pub static OHHH: Melody = Melody {
    name: "ohhh",
    notes: &OHHH_NOTES,
    gap_ms: 0,
};

/// Every tune, in selection order.
pub static CATALOG: [&Melody; 4] = [&MARCH, &R2D2, &UHOH, &OHHH];
