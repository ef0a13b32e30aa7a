//! High-level interface for the Unit Scroll.
//!
//! [`ScrollUnit`] wraps the register protocol driver with typed accessors
//! for the encoder, button and LED, plus the callback registry that feeds
//! the polling loop in [`event_loop`](crate::event_loop).

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::i2c::I2c;

use crate::driver::ScrollDriver;
use crate::error::ScrollError;
use crate::registers::{
    BOOTLOADER_VERSION, BUTTON, BUTTON_PRESSED, ENCODER, FIRMWARE_VERSION, I2C_ADDRESS,
    INC_ENCODER, LED_INDEX, MAX_ADDRESS, MIN_ADDRESS, RESET, RGB_LED, RGB_LED_LEN,
};
use crate::registry::{ButtonHandler, CallbackRegistry, EncoderHandler, LoopState};

/// High-level interface for one Unit Scroll.
///
/// Every method takes `&self`, so a single instance can be shared between
/// the task running the event loop and application tasks. Each register
/// operation holds the bus mutex for its whole duration, which keeps the
/// two-phase read (register select, then read) from interleaving with other
/// traffic to the unit.
///
/// `M` picks the mutex flavour: `CriticalSectionRawMutex` when the unit is
/// shared across tasks or interrupt priorities, `NoopRawMutex` when it lives
/// in a single task.
///
/// # Example
///
/// ```no_run
/// use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
/// use scroll_driver::{ScrollUnit, DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let unit: ScrollUnit<'_, CriticalSectionRawMutex, _> = ScrollUnit::new(i2c, DEFAULT_ADDRESS);
///
/// unit.set_led_color(0x00FF00).await.unwrap();
/// let position = unit.read_encoder_value().await.unwrap();
/// # }
/// ```
pub struct ScrollUnit<'h, M: RawMutex, I2C> {
    pub(crate) driver: Mutex<M, ScrollDriver<I2C>>,
    pub(crate) registry: CallbackRegistry<'h, M>,
    pub(crate) stop: Signal<M, ()>,
}

impl<'h, M, I2C> ScrollUnit<'h, M, I2C>
where
    M: RawMutex,
    I2C: I2c,
{
    /// Create a new Unit Scroll interface.
    ///
    /// No I2C traffic is generated and the event loop stays stopped until a
    /// handler is registered.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (typically 0x40)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            driver: Mutex::new(ScrollDriver::new(i2c, address)),
            registry: CallbackRegistry::new(),
            stop: Signal::new(),
        }
    }

    /// Tear down the interface and hand back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.driver.into_inner().release()
    }

    /// The I2C address transactions are currently sent to.
    pub async fn address(&self) -> u8 {
        self.driver.lock().await.address()
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Read the absolute encoder position.
    ///
    /// # Errors
    /// * [`ScrollError::I2c`] on communication failure
    pub async fn read_encoder_value(&self) -> Result<i16, ScrollError<I2C::Error>> {
        self.driver.lock().await.read_i16(ENCODER).await
    }

    /// Read the incremental encoder counter.
    ///
    /// Tracks relative motion independently of the absolute position and is
    /// not used by the event loop.
    pub async fn read_inc_encoder_value(&self) -> Result<i16, ScrollError<I2C::Error>> {
        self.driver.lock().await.read_i16(INC_ENCODER).await
    }

    /// Read the button state. Returns `true` while the button is pressed.
    ///
    /// The button register is active-low: exactly `0x00` means pressed, any
    /// other byte means released.
    pub async fn read_button_status(&self) -> Result<bool, ScrollError<I2C::Error>> {
        let status = self.driver.lock().await.read_u8(BUTTON).await?;
        Ok(status == BUTTON_PRESSED)
    }

    pub async fn read_firmware_version(&self) -> Result<u8, ScrollError<I2C::Error>> {
        self.driver.lock().await.read_u8(FIRMWARE_VERSION).await
    }

    pub async fn read_bootloader_version(&self) -> Result<u8, ScrollError<I2C::Error>> {
        self.driver.lock().await.read_u8(BOOTLOADER_VERSION).await
    }

    /// Read the address the unit reports in its own address register.
    pub async fn read_i2c_address(&self) -> Result<u8, ScrollError<I2C::Error>> {
        self.driver.lock().await.read_u8(I2C_ADDRESS).await
    }

    // -----------------------------------------------------------------------
    // Write operations
    // -----------------------------------------------------------------------

    /// Set the LED colour from a `0xRRGGBB` value.
    ///
    /// Bits above the low 24 are ignored.
    ///
    /// # Example
    /// ```ignore
    /// unit.set_led_color(0xFF0000).await?; // red
    /// ```
    pub async fn set_led_color(&self, color: u32) -> Result<(), ScrollError<I2C::Error>> {
        let [_, red, green, blue] = color.to_be_bytes();
        self.set_led_rgb(red, green, blue).await
    }

    /// Set the LED colour from individual channels.
    pub async fn set_led_rgb(
        &self,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), ScrollError<I2C::Error>> {
        let payload: [u8; RGB_LED_LEN] = [LED_INDEX, red, green, blue];
        self.driver.lock().await.write_register(RGB_LED, &payload).await
    }

    /// Switch the LED off. Same as `set_led_color(0x000000)`.
    pub async fn turn_led_off(&self) -> Result<(), ScrollError<I2C::Error>> {
        self.set_led_color(0x000000).await
    }

    /// Overwrite the absolute encoder position.
    pub async fn set_encoder_value(&self, value: i16) -> Result<(), ScrollError<I2C::Error>> {
        self.driver.lock().await.write_i16(ENCODER, value).await
    }

    /// Ask the unit to reset its encoder. The exact reset behaviour is up to
    /// the firmware; nothing is read back.
    pub async fn reset_encoder(&self) -> Result<(), ScrollError<I2C::Error>> {
        self.driver.lock().await.write_u8(RESET, 1).await
    }

    /// Move the unit to a new I2C address and retarget this interface.
    ///
    /// # Errors
    /// * [`ScrollError::InvalidAddress`] if `address` is outside 0x08-0x77;
    ///   nothing is sent in that case
    /// * [`ScrollError::I2c`] on communication failure; the interface keeps
    ///   the old address
    pub async fn set_i2c_address(&self, address: u8) -> Result<(), ScrollError<I2C::Error>> {
        if !(MIN_ADDRESS..=MAX_ADDRESS).contains(&address) {
            return Err(ScrollError::InvalidAddress(address));
        }

        let mut driver = self.driver.lock().await;
        driver.write_u8(I2C_ADDRESS, address).await?;
        driver.set_address(address);

        #[cfg(feature = "defmt")]
        defmt::info!("Unit Scroll moved to address {=u8:#x}", address);

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Event registration
    // -----------------------------------------------------------------------

    /// Register the button handler, replacing any previous one.
    ///
    /// The handler is called on the polling task with `true` when the button
    /// goes down and `false` when it comes back up. Registrations are not
    /// additive: only the most recent handler is kept.
    ///
    /// The first registration of either kind starts the event loop.
    pub fn on_button(&self, handler: ButtonHandler<'h>) {
        if self.registry.set_button(handler) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Button handler registered, starting event loop");
        }
    }

    /// Register the encoder handler, replacing any previous one.
    ///
    /// The handler receives `(value, delta)` each time the polled encoder
    /// value differs from the previous sample.
    ///
    /// The first registration of either kind starts the event loop.
    pub fn on_encoder_change(&self, handler: EncoderHandler<'h>) {
        if self.registry.set_encoder(handler) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Encoder handler registered, starting event loop");
        }
    }

    /// Whether a handler registration has started the event loop.
    ///
    /// This reflects the Stopped/Running state only: it turns `true` on the
    /// first registration even if no [`run`](Self::run) future is being
    /// awaited yet.
    pub fn is_running(&self) -> bool {
        self.registry.state() == LoopState::Running
    }
}
