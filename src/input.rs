//! Button handling: the interrupt flag, debouncing, and the press state machine.

use core::{
    convert::Infallible,
    sync::atomic::{AtomicBool, Ordering},
};

use embedded_hal::{
    blocking::delay::{DelayMs, DelayUs},
    digital::v2::{InputPin, OutputPin},
};
use fugit::MillisDurationU32;
use rand_core::RngCore;

use crate::{
    audio::Speaker,
    fmt::{debug, infallible},
    melody::Melody,
    selector::Selector,
};

/// How long a press must settle before the line is trusted.
pub const DEBOUNCE: MillisDurationU32 = MillisDurationU32::millis(250);

/// One-slot flag the button interrupt raises and the main loop consumes.
///
/// Edges that arrive while the flag is already raised are folded into it.
pub struct PendingEvent {
    raised: AtomicBool,
}

impl PendingEvent {
    /// A lowered flag, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag. This is all the interrupt handler does.
    pub fn signal(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Whether an event is waiting.
    pub fn is_pending(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Consume the event, if any.
    ///
    /// Plain load and store rather than a swap, which Cortex-M0+ lacks. An
    /// edge landing between the two is merged with the one being consumed.
    pub fn take(&self) -> bool {
        if self.raised.load(Ordering::Acquire) {
            self.raised.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }
}

impl Default for PendingEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// Push-button wired to ground with a pull-up, so the line reads low while
/// the button is held.
pub struct Button<P> {
    pin: P,
}

impl<P> Button<P>
where
    P: InputPin<Error = Infallible>,
{
    /// Wrap the button's input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Whether the button is currently pressed.
    pub fn pressed(&self) -> bool {
        infallible(self.pin.is_low())
    }

    /// Whether the button is currently released.
    pub fn released(&self) -> bool {
        infallible(self.pin.is_high())
    }
}

/// Where the controller is in handling a press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Nothing to do.
    Idle,
    /// An edge was seen and not yet looked at.
    EventPending,
    /// Waiting out contact bounce.
    Debouncing,
    /// A tune is playing.
    Playing,
}

/// What one call to [`Controller::poll`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cycle {
    /// No event was pending.
    Quiet,
    /// An event was pending but the button did not settle released.
    Rejected,
    /// A press was accepted; holds the tune that played, if the catalog had one.
    Played(Option<&'static Melody>),
}

/// Turns pending button events into tunes.
///
/// Single-threaded and cooperative: each [`poll`](Controller::poll) runs a
/// whole press to completion and leaves the controller in [`State::Idle`].
pub struct Controller<B, L, S, D, R> {
    button: Button<B>,
    indicator: L,
    speaker: Speaker<S>,
    delay: D,
    selector: Selector<R>,
    debounce: MillisDurationU32,
    state: State,
}

impl<B, L, S, D, R> Controller<B, L, S, D, R>
where
    B: InputPin<Error = Infallible>,
    L: OutputPin<Error = Infallible>,
    S: OutputPin<Error = Infallible>,
    D: DelayUs<u32> + DelayMs<u32>,
    R: RngCore,
{
    /// Build a controller; the indicator starts off.
    pub fn new(
        button: Button<B>,
        mut indicator: L,
        speaker: Speaker<S>,
        delay: D,
        selector: Selector<R>,
    ) -> Self {
        infallible(indicator.set_low());
        Self {
            button,
            indicator,
            speaker,
            delay,
            selector,
            debounce: DEBOUNCE,
            state: State::Idle,
        }
    }

    /// Current state. Always [`State::Idle`] between polls.
    pub fn state(&self) -> State {
        self.state
    }

    /// The tune selector.
    pub fn selector(&self) -> &Selector<R> {
        &self.selector
    }

    fn enter(&mut self, state: State) {
        debug!("{} -> {}", self.state, state);
        self.state = state;
    }

    /// Handle the pending event, if there is one.
    ///
    /// Blocks for the debounce window and, when the press is accepted, for
    /// the whole tune. Edges inside the debounce window are bounce and are
    /// dropped; edges during the tune stay pending for the next call.
    pub fn poll(&mut self, pending: &PendingEvent) -> Cycle {
        if !pending.is_pending() {
            return Cycle::Quiet;
        }
        self.enter(State::EventPending);

        pending.take();
        self.enter(State::Debouncing);
        self.delay.delay_ms(self.debounce.ticks());
        if pending.take() {
            debug!("dropped edges inside the debounce window");
        }

        if !self.button.released() {
            debug!("bounce rejected");
            self.enter(State::Idle);
            return Cycle::Rejected;
        }

        self.enter(State::Playing);
        infallible(self.indicator.set_high());
        let melody = self
            .selector
            .select_and_play(&mut self.speaker, &mut self.delay);
        infallible(self.indicator.set_low());

        self.enter(State::Idle);
        Cycle::Played(melody)
    }
}
