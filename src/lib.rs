//! Async driver for the M5Stack Unit Scroll.
//!
//! The Unit Scroll is a rotary encoder with a push button and a single RGB
//! LED, driven over I2C through a small byte-offset register map. This crate
//! provides an `embedded-hal-async` driver plus an Embassy-friendly polling
//! loop that turns register samples into button and encoder events.
//!
//! # Architecture
//!
//! - **`driver`** (crate-private) — register protocol: one-transaction
//!   writes, select-then-read reads, little-endian decoding.
//! - **[`ScrollUnit`]** (public) — typed accessors for the encoder, button
//!   and LED, and handler registration.
//! - **[`event_loop`]** (public) — [`PollConfig`] and the
//!   [`ScrollUnit::run`] loop that calls the registered handlers on
//!   button edges and encoder changes.
//!
//! # Quick start
//!
//! ```ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use scroll_driver::{PollConfig, ScrollUnit, DEFAULT_ADDRESS};
//!
//! static UNIT: StaticCell<ScrollUnit<'static, CriticalSectionRawMutex, MyI2c>> = StaticCell::new();
//!
//! let unit = &*UNIT.init(ScrollUnit::new(i2c, DEFAULT_ADDRESS));
//! unit.on_encoder_change(&|value, delta| info!("v: {} d: {}", value, delta));
//! spawner.spawn(scroll_task(unit)).unwrap();
//!
//! // Thin task wrapper (Embassy tasks cannot be generic):
//! #[embassy_executor::task]
//! async fn scroll_task(unit: &'static ScrollUnit<'static, CriticalSectionRawMutex, MyI2c>) {
//!     unit.run(&PollConfig::default()).await;
//! }
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on error types
//!   and structured logging from the event loop.

#![cfg_attr(not(test), no_std)]

pub mod event_loop;
pub mod registers;

mod driver;
mod error;
mod registry;
mod scroll_unit;

#[cfg(test)]
mod mock;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use error::ScrollError;
pub use event_loop::{PollConfig, PollSnapshot};
pub use registers::DEFAULT_ADDRESS;
pub use registry::{ButtonHandler, EncoderHandler};
pub use scroll_unit::ScrollUnit;
