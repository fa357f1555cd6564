//! RP2040 wiring and bring-up.
//!
//! | Signal    | Pin    |
//! |-----------|--------|
//! | Piezo     | GPIO28 |
//! | Indicator | GPIO16 |
//! | LED       | GPIO25 |
//! | Button    | GPIO14 (pull-up, falling edge) |
//! | Noise     | GPIO26 / ADC0, left floating |
//!
//! With the `silent` feature the square wave goes to the LED and the piezo
//! stays low.

use core::{cell::RefCell, convert::Infallible};

use critical_section::Mutex;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use rand_pcg::Pcg32;
use rp2040_hal::{
    adc::{Adc, AdcPin},
    clocks,
    gpio::{
        bank0::{Gpio14, Gpio16, Gpio25, Gpio28},
        FunctionSioInput, FunctionSioOutput, Interrupt, Pin, Pins, PullDown, PullUp,
    },
    pac::{self, CorePeripherals, Peripherals},
    Clock, Sio, Watchdog,
};

use crate::{
    catalog::CATALOG,
    fmt::{infallible, info},
    input::{Button, Controller, PendingEvent},
    power::Wfi,
    selector::{sample_seed, Selector},
    timing::SpinDelay,
    Jukebox, Speaker,
};

const XTAL_FREQ_HZ: u32 = 12_000_000;

/// The push-button input.
pub type ButtonPin = Pin<Gpio14, FunctionSioInput, PullUp>;
/// The status indicator output.
pub type IndicatorPin = Pin<Gpio16, FunctionSioOutput, PullDown>;
/// The on-board LED.
pub type LedPin = Pin<Gpio25, FunctionSioOutput, PullDown>;
/// The piezo speaker output.
pub type PiezoPin = Pin<Gpio28, FunctionSioOutput, PullDown>;

/// Pin the square wave is played on.
#[cfg(not(feature = "silent"))]
pub type TonePin = PiezoPin;
/// Pin the square wave is played on.
#[cfg(feature = "silent")]
pub type TonePin = LedPin;

/// The assembled firmware.
pub type Firmware = Jukebox<SharedButton, IndicatorPin, TonePin, SpinDelay, Pcg32, Wfi>;

static BUTTON: Mutex<RefCell<Option<ButtonPin>>> = Mutex::new(RefCell::new(None));

/// Clear the button's edge interrupt so it does not fire again at once.
///
/// Call from the `IO_IRQ_BANK0` handler.
pub fn acknowledge_button() {
    critical_section::with(|cs| {
        if let Some(button) = BUTTON.borrow_ref_mut(cs).as_mut() {
            button.clear_interrupt(Interrupt::EdgeLow);
        }
    });
}

/// Main-loop view of the button pin, which the interrupt handler shares.
pub struct SharedButton {
    _private: (),
}

impl InputPin for SharedButton {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        critical_section::with(|cs| {
            BUTTON
                .borrow_ref(cs)
                .as_ref()
                .map_or(Ok(true), InputPin::is_high)
        })
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Everything the firmware needs, configured and ready.
pub struct Board {
    /// Output the tunes are played on.
    pub tone: TonePin,
    /// Lit while a tune plays.
    pub indicator: IndicatorPin,
    /// The button, shared with its interrupt handler.
    pub button: SharedButton,
    /// Spin delay calibrated to the system clock.
    pub delay: SpinDelay,
    /// Deep-sleep standby.
    pub standby: Wfi,
    /// Seed read from the floating ADC input.
    pub seed: u64,
}

impl Board {
    /// Bring up clocks, pins and the ADC seed. Panics if called twice.
    pub fn take() -> Self {
        let mut pac = Peripherals::take().expect("Failed to take Peripherals singleton");
        let mut core = CorePeripherals::take().expect("Failed to take core peripherals");

        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let clocks = clocks::init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .expect("Failed to initialize clocks");

        let sio = Sio::new(pac.SIO);
        let pins = Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        // One conversion, then the ADC is dropped for good.
        let seed = {
            let mut adc = Adc::new(pac.ADC, &mut pac.RESETS);
            let mut noise = AdcPin::new(pins.gpio26.into_floating_input());
            sample_seed::<Adc, _, _>(&mut adc, &mut noise)
        };

        let piezo: PiezoPin = pins.gpio28.into_push_pull_output();
        let led: LedPin = pins.gpio25.into_push_pull_output();
        #[cfg(not(feature = "silent"))]
        let (tone, mut spare) = (piezo, led);
        #[cfg(feature = "silent")]
        let (tone, mut spare) = (led, piezo);
        infallible(OutputPin::set_low(&mut spare));

        let indicator: IndicatorPin = pins.gpio16.into_push_pull_output();

        let button: ButtonPin = pins.gpio14.into_pull_up_input();
        button.set_interrupt_enabled(Interrupt::EdgeLow, true);
        critical_section::with(|cs| BUTTON.borrow(cs).replace(Some(button)));

        info!("board up, sysclk {=u32} Hz", clocks.system_clock.freq().to_Hz());

        Self {
            tone,
            indicator,
            button: SharedButton { _private: () },
            delay: SpinDelay::new(clocks.system_clock.freq()),
            standby: Wfi::new(&mut core.SCB),
            seed,
        }
    }

    /// Assemble the firmware and start taking button interrupts.
    pub fn into_jukebox(self, pending: &'static PendingEvent) -> Firmware {
        let controller = Controller::new(
            Button::new(self.button),
            self.indicator,
            Speaker::new(self.tone),
            self.delay,
            Selector::seeded(self.seed, &CATALOG),
        );
        // SAFETY: the handler only touches `BUTTON` and `pending`, both of
        // which are initialised by now.
        unsafe { pac::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0) };
        Jukebox::new(controller, self.standby, pending)
    }
}
