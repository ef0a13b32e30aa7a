//! Callback slots and event-loop start state.
//!
//! One slot per event kind. Registering a handler replaces whatever was in
//! the slot; handlers are not accumulated. The first registration moves the
//! loop from [`LoopState::Stopped`] to [`LoopState::Running`] and raises the
//! start signal the polling future waits on.
//!
//! Separately, at most one polling future may own the unit at a time; it
//! claims the `polling` flag before waiting for the start signal.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::signal::Signal;

/// Button handler, called with `true` on press and `false` on release.
pub type ButtonHandler<'h> = &'h (dyn Fn(bool) + Sync);

/// Encoder handler, called with `(value, delta)` whenever the value moves.
pub type EncoderHandler<'h> = &'h (dyn Fn(i16, i16) + Sync);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoopState {
    Stopped,
    Running,
}

#[derive(Clone, Copy)]
struct Slots<'h> {
    button: Option<ButtonHandler<'h>>,
    encoder: Option<EncoderHandler<'h>>,
    state: LoopState,
    polling: bool,
}

pub(crate) struct CallbackRegistry<'h, M: RawMutex> {
    slots: BlockingMutex<M, Cell<Slots<'h>>>,
    started: Signal<M, ()>,
}

impl<'h, M: RawMutex> CallbackRegistry<'h, M> {
    pub const fn new() -> Self {
        Self {
            slots: BlockingMutex::new(Cell::new(Slots {
                button: None,
                encoder: None,
                state: LoopState::Stopped,
                polling: false,
            })),
            started: Signal::new(),
        }
    }

    /// Store the button handler. Returns `true` if this call started the loop.
    pub fn set_button(&self, handler: ButtonHandler<'h>) -> bool {
        self.update(|slots| slots.button = Some(handler));
        self.ensure_running()
    }

    /// Store the encoder handler. Returns `true` if this call started the loop.
    pub fn set_encoder(&self, handler: EncoderHandler<'h>) -> bool {
        self.update(|slots| slots.encoder = Some(handler));
        self.ensure_running()
    }

    pub fn button(&self) -> Option<ButtonHandler<'h>> {
        self.slots.lock(|cell| cell.get().button)
    }

    pub fn encoder(&self) -> Option<EncoderHandler<'h>> {
        self.slots.lock(|cell| cell.get().encoder)
    }

    pub fn state(&self) -> LoopState {
        self.slots.lock(|cell| cell.get().state)
    }

    /// Whether a polling future currently owns the loop (waiting or running).
    pub fn is_polling(&self) -> bool {
        self.slots.lock(|cell| cell.get().polling)
    }

    /// Claim the loop for one polling future. Returns `false` if another
    /// future already holds it.
    pub fn claim_polling(&self) -> bool {
        self.slots.lock(|cell| {
            let mut slots = cell.get();
            if slots.polling {
                return false;
            }
            slots.polling = true;
            cell.set(slots);
            true
        })
    }

    /// Wait until the first registration has happened.
    pub async fn wait_started(&self) {
        if self.state() == LoopState::Running {
            self.started.reset();
            return;
        }
        self.started.wait().await;
    }

    /// Back to Stopped and release the polling claim.
    pub fn mark_stopped(&self) {
        self.update(|slots| {
            slots.state = LoopState::Stopped;
            slots.polling = false;
        });
        self.started.reset();
    }

    /// Stopped -> Running, at most once per stop.
    fn ensure_running(&self) -> bool {
        let transitioned = self.slots.lock(|cell| {
            let mut slots = cell.get();
            if slots.state == LoopState::Running {
                return false;
            }
            slots.state = LoopState::Running;
            cell.set(slots);
            true
        });

        if transitioned {
            self.started.signal(());
        }
        transitioned
    }

    fn update(&self, f: impl FnOnce(&mut Slots<'h>)) {
        self.slots.lock(|cell| {
            let mut slots = cell.get();
            f(&mut slots);
            cell.set(slots);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    use super::*;

    type Registry<'h> = CallbackRegistry<'h, CriticalSectionRawMutex>;

    #[test]
    fn starts_stopped_and_empty() {
        let registry = Registry::new();
        assert_eq!(registry.state(), LoopState::Stopped);
        assert!(registry.button().is_none());
        assert!(registry.encoder().is_none());
    }

    #[test]
    fn repeated_registration_starts_once() {
        let noop = |_: bool| {};
        let noop_encoder = |_: i16, _: i16| {};
        let registry = Registry::new();

        assert!(registry.set_button(&noop));
        assert!(!registry.set_button(&noop));
        assert!(!registry.set_encoder(&noop_encoder));
        assert_eq!(registry.state(), LoopState::Running);
    }

    #[test]
    fn last_registration_wins() {
        let calls = Mutex::new(Vec::new());
        let first = |p: bool| calls.lock().unwrap().push(("first", p));
        let second = |p: bool| calls.lock().unwrap().push(("second", p));

        let registry = Registry::new();
        registry.set_button(&first);
        registry.set_button(&second);

        (registry.button().unwrap())(true);
        assert_eq!(*calls.lock().unwrap(), vec![("second", true)]);
    }

    #[test]
    fn wait_started_returns_after_registration() {
        let noop = |_: i16, _: i16| {};
        let registry = Registry::new();
        registry.set_encoder(&noop);
        block_on(registry.wait_started());
        assert_eq!(registry.state(), LoopState::Running);
    }

    #[test]
    fn only_one_polling_claim() {
        let registry = Registry::new();
        assert!(!registry.is_polling());

        assert!(registry.claim_polling());
        assert!(!registry.claim_polling());
        assert!(registry.is_polling());

        registry.mark_stopped();
        assert!(!registry.is_polling());
        assert!(registry.claim_polling());
    }

    #[test]
    fn stop_allows_a_fresh_start() {
        let noop = |_: bool| {};
        let registry = Registry::new();

        assert!(registry.set_button(&noop));
        registry.mark_stopped();
        assert_eq!(registry.state(), LoopState::Stopped);
        // Handlers survive the stop.
        assert!(registry.button().is_some());
        assert!(registry.set_button(&noop));
    }
}
