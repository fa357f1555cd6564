//! Host-side doubles for the hardware the controller talks to.

use std::{
    cell::{Cell, RefCell},
    convert::Infallible,
    rc::Rc,
};

use embedded_hal::{
    adc::{Channel, OneShot},
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::{InputPin, OutputPin},
};
use rand_core::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::{input::PendingEvent, power::Standby};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    SpeakerHigh,
    SpeakerLow,
    IndicatorHigh,
    IndicatorLow,
    DelayUs(u32),
    DelayMs(u32),
    Standby,
}

/// Shared, ordered record of everything the doubles observed.
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, event: Event) -> usize {
        self.0.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn speaker(&self) -> RecordingPin {
        RecordingPin {
            log: self.clone(),
            high: Event::SpeakerHigh,
            low: Event::SpeakerLow,
        }
    }

    pub fn indicator(&self) -> RecordingPin {
        RecordingPin {
            log: self.clone(),
            high: Event::IndicatorHigh,
            low: Event::IndicatorLow,
        }
    }

    pub fn delay(&self) -> VirtualDelay {
        VirtualDelay {
            log: self.clone(),
            calls: 0,
            interrupts: Vec::new(),
            pending: None,
        }
    }

    pub fn standby(&self) -> RecordingStandby {
        RecordingStandby { log: self.clone() }
    }
}

pub struct RecordingPin {
    log: Log,
    high: Event,
    low: Event,
}

impl OutputPin for RecordingPin {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.push(self.high);
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.push(self.low);
        Ok(())
    }
}

/// Records every wait instead of spinning, and can play the interrupt
/// handler's part by signalling a pending event after a given wait.
pub struct VirtualDelay {
    log: Log,
    calls: usize,
    interrupts: Vec<usize>,
    pending: Option<&'static PendingEvent>,
}

impl VirtualDelay {
    /// Signal `pending` as the `n`th wait (counting from one) begins.
    pub fn interrupt_at(mut self, pending: &'static PendingEvent, calls: &[usize]) -> Self {
        self.pending = Some(pending);
        self.interrupts.extend_from_slice(calls);
        self
    }

    fn tick(&mut self, event: Event) {
        self.calls += 1;
        if let Some(pending) = self.pending {
            if self.interrupts.contains(&self.calls) {
                pending.signal();
            }
        }
        self.log.push(event);
    }
}

impl DelayUs<u32> for VirtualDelay {
    fn delay_us(&mut self, us: u32) {
        self.tick(Event::DelayUs(us));
    }
}

impl DelayMs<u32> for VirtualDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.tick(Event::DelayMs(ms));
    }
}

/// Button whose line level the test sets directly.
#[derive(Clone)]
pub struct FakeButton {
    high: Rc<Cell<bool>>,
}

impl FakeButton {
    /// A button resting in its released (pulled-up) state.
    pub fn released() -> Self {
        Self {
            high: Rc::new(Cell::new(true)),
        }
    }

    pub fn hold(&self) {
        self.high.set(false);
    }

    pub fn release(&self) {
        self.high.set(true);
    }
}

impl InputPin for FakeButton {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.high.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.high.get())
    }
}

pub struct RecordingStandby {
    log: Log,
}

impl Standby for RecordingStandby {
    fn standby(&mut self, pending: &PendingEvent) {
        if !pending.is_pending() {
            self.log.push(Event::Standby);
        }
    }
}

/// Generator that counts how often it is drawn from.
#[derive(Clone)]
pub struct CountingRng {
    inner: Pcg32,
    draws: Rc<Cell<u32>>,
}

impl CountingRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
            draws: Rc::default(),
        }
    }

    pub fn draws(&self) -> Rc<Cell<u32>> {
        self.draws.clone()
    }

    fn count(&self) {
        self.draws.set(self.draws.get() + 1);
    }
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.count();
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.count();
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.count();
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.count();
        self.inner.try_fill_bytes(dest)
    }
}

pub struct FakeAdc {
    pub reading: Result<u16, ()>,
    pub conversions: u32,
}

pub struct FloatingPin;

impl Channel<FakeAdc> for FloatingPin {
    type ID = u8;

    fn channel() -> u8 {
        0
    }
}

impl OneShot<FakeAdc, u16, FloatingPin> for FakeAdc {
    type Error = ();

    fn read(&mut self, _pin: &mut FloatingPin) -> nb::Result<u16, ()> {
        self.conversions += 1;
        // The first poll reports a conversion still in flight.
        if self.conversions == 1 {
            return Err(nb::Error::WouldBlock);
        }
        self.reading.map_err(nb::Error::Other)
    }
}
