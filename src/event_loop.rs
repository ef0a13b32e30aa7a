//! Polling loop and its configuration.
//!
//! Contains [`PollConfig`], the [`PollSnapshot`] edge detector, and the
//! [`ScrollUnit::run`] family of async functions that sample the button and
//! encoder registers at a fixed interval and dispatch registered handlers on
//! every state transition.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::error::ScrollError;
use crate::scroll_unit::ScrollUnit;

// ── PollConfig ───────────────────────────────────────────────────────────

/// Configuration for the polling loop.
///
/// [`PollConfig::default()`] polls every 50 ms and starts from a
/// not-pressed, zero-position snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between poll cycles in milliseconds. Default: 50.
    pub poll_interval_ms: u32,
    /// Seed the snapshot from the device when the loop starts, so the first
    /// cycle only reports real movement. Default: `false` (the first non-zero
    /// encoder sample is reported as a change from 0).
    pub read_baseline: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            read_baseline: false,
        }
    }
}

// ── PollSnapshot ─────────────────────────────────────────────────────────

/// Last-known button and encoder state, owned by the running loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PollSnapshot {
    pub pressed: bool,
    pub value: i16,
}

impl PollSnapshot {
    /// Record a button sample. Returns the new state on a transition.
    pub fn observe_button(&mut self, pressed: bool) -> Option<bool> {
        if pressed == self.pressed {
            return None;
        }
        self.pressed = pressed;
        Some(pressed)
    }

    /// Record an encoder sample. Returns `(value, delta)` when it moved.
    ///
    /// The delta wraps at 16 bits, so stepping from `i16::MAX` to `i16::MIN`
    /// reads as `+1`.
    pub fn observe_encoder(&mut self, value: i16) -> Option<(i16, i16)> {
        if value == self.value {
            return None;
        }
        let delta = value.wrapping_sub(self.value);
        self.value = value;
        Some((value, delta))
    }
}

// ── Event loop ───────────────────────────────────────────────────────────

impl<'h, M, I2C> ScrollUnit<'h, M, I2C>
where
    M: RawMutex,
    I2C: I2c,
{
    /// Poll the unit and dispatch handlers until [`stop`](Self::stop) is
    /// called, sleeping with [`embassy_time::Delay`].
    ///
    /// This is a regular `async fn`, **not** an Embassy `#[task]`. Embassy
    /// tasks cannot be generic, so wrap it in a thin concrete task:
    ///
    /// ```ignore
    /// #[embassy_executor::task]
    /// async fn scroll_task(unit: &'static ScrollUnit<'static, CriticalSectionRawMutex, MyI2c>) {
    ///     unit.run(&PollConfig::default()).await;
    /// }
    /// ```
    ///
    /// Nothing touches the bus until the first handler is registered.
    pub async fn run(&self, config: &PollConfig) {
        self.run_with_delay(embassy_time::Delay, config).await;
    }

    /// Same as [`run`](Self::run) with a caller-supplied delay source.
    ///
    /// # Control flow
    ///
    /// 1. Claim the unit. If another `run*` future already polls it, return
    ///    at once so edges are never dispatched twice.
    /// 2. Wait until a handler registration starts the loop (or a stop
    ///    request arrives first, in which case return).
    /// 3. Build the snapshot: defaults, or a device read when
    ///    `config.read_baseline` is set.
    /// 4. Loop until stopped:
    ///    - **Button** — read, compare, call the button handler on an edge.
    ///    - **Encoder** — read, compare, call the encoder handler with
    ///      `(value, delta)` on a change.
    ///    - **Sleep** — `config.poll_interval_ms`, cut short by `stop()`.
    ///
    /// # Errors
    ///
    /// A bus failure while polling is logged and the rest of that cycle is
    /// skipped. The snapshot keeps its previous value, so the change is
    /// reported on the next successful read. The loop never exits on error.
    pub async fn run_with_delay<D>(&self, mut delay: D, config: &PollConfig)
    where
        D: DelayNs,
    {
        // ── Claim the unit ───────────────────────────────────────────────
        if !self.registry.claim_polling() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Scroll event loop already polling; ignoring second run");
            return;
        }
        self.stop.reset();

        // ── Wait for the first registration ──────────────────────────────
        if let Either::Second(()) = select(self.registry.wait_started(), self.stop.wait()).await {
            self.registry.mark_stopped();
            return;
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Scroll event loop running ({=u32} ms interval)",
            config.poll_interval_ms
        );

        let mut snapshot = PollSnapshot::default();
        if config.read_baseline {
            match self.read_baseline().await {
                Ok(baseline) => snapshot = baseline,
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "Could not read baseline; starting from defaults: {}",
                        defmt::Debug2Format(&_e)
                    );
                }
            }
        }

        // ── Main loop ────────────────────────────────────────────────────
        loop {
            if self.stop.signaled() {
                break;
            }

            self.poll_once(&mut snapshot).await;

            if let Either::Second(()) =
                select(delay.delay_ms(config.poll_interval_ms), self.stop.wait()).await
            {
                break;
            }
        }

        self.stop.reset();
        self.registry.mark_stopped();

        #[cfg(feature = "defmt")]
        defmt::info!("Scroll event loop stopped");
    }

    /// Ask a running (or waiting) event loop to return.
    ///
    /// The loop notices the request before its next cycle or while sleeping.
    /// Registered handlers are kept; a later registration starts the loop
    /// again once [`run`](Self::run) is awaited again. Without an awaited
    /// `run*` future there is nothing to stop and the call does nothing.
    pub fn stop(&self) {
        if self.registry.is_polling() {
            self.stop.signal(());
        }
    }

    /// One sample of both registers, dispatching handlers on transitions.
    async fn poll_once(&self, snapshot: &mut PollSnapshot) {
        // ── Button ───────────────────────────────────────────────────────
        let pressed = match self.read_button_status().await {
            Ok(pressed) => pressed,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Button poll failed: {}", defmt::Debug2Format(&_e));
                return;
            }
        };
        if let Some(edge) = snapshot.observe_button(pressed) {
            if let Some(handler) = self.registry.button() {
                handler(edge);
            }
        }

        // ── Encoder ──────────────────────────────────────────────────────
        let value = match self.read_encoder_value().await {
            Ok(value) => value,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Encoder poll failed: {}", defmt::Debug2Format(&_e));
                return;
            }
        };
        if let Some((value, delta)) = snapshot.observe_encoder(value) {
            if let Some(handler) = self.registry.encoder() {
                handler(value, delta);
            }
        }
    }

    async fn read_baseline(&self) -> Result<PollSnapshot, ScrollError<I2C::Error>> {
        Ok(PollSnapshot {
            pressed: self.read_button_status().await?,
            value: self.read_encoder_value().await?,
        })
    }
}
