#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;
// Halt on panic, or report it over RTT when logging is enabled.
#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;

use jukebox::{
    board::{self, Board},
    PendingEvent,
};
use rp2040_hal::pac::interrupt;

/// The linker will place this boot block at the start of our program image. We
/// need this to help the ROM bootloader get our code up and running.
#[link_section = ".boot2"]
#[used]
pub static BOOT2_FIRMWARE: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

static PENDING: PendingEvent = PendingEvent::new();

/// Entry point to our bare-metal application.
///
/// The `#[rp2040_hal::entry]` macro ensures the Cortex-M start-up code calls this function
/// as soon as all global variables and the spinlock are initialised.
#[rp2040_hal::entry]
fn main() -> ! {
    #[cfg(feature = "defmt")]
    defmt::info!("jukebox starting");

    Board::take().into_jukebox(&PENDING).run()
}

#[interrupt]
fn IO_IRQ_BANK0() {
    board::acknowledge_button();
    PENDING.signal();
}
