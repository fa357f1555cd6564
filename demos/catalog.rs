#![no_std]
#![no_main]

use cortex_m::asm;
#[cfg(feature = "defmt")]
use defmt_rtt as _;
// Ensure we halt the program on panic (if we don't mention this crate it won't
// be linked)
#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;

/// The linker will place this boot block at the start of our program image. We
/// need this to help the ROM bootloader get our code up and running.
#[link_section = ".boot2"]
#[used]
pub static BOOT2_FIRMWARE: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

use jukebox::{board::Board, catalog::CATALOG, Speaker};

/// Plays every tune in the catalog once, one second apart, then parks the
/// core. Handy for checking the speaker wiring.
#[rp2040_hal::entry]
fn main() -> ! {
    let mut board = Board::take();
    let mut speaker = Speaker::new(board.tone);

    for melody in CATALOG {
        melody.play(&mut speaker, &mut board.delay);
        board.delay.delay_milliseconds(1_000);
    }

    loop {
        asm::wfe();
    }
}
