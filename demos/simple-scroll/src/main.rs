//! Simple Unit Scroll demo
//!
//! Registers button and encoder handlers on a Unit Scroll attached to a
//! Raspberry Pi Pico 2. Encoder moves are logged via defmt; pressing the
//! button turns the LED red, releasing it turns the LED green.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes |
//! |-----------|------------|-------|
//! | I2C0 SDA  | GP20       |       |
//! | I2C0 SCL  | GP21       |       |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use scroll_driver::{PollConfig, ScrollUnit, DEFAULT_ADDRESS};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

// Wire the I2C0 interrupt to Embassy's handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

type ScrollI2c = I2c<'static, I2C0, i2c::Async>;
type Scroll = ScrollUnit<'static, CriticalSectionRawMutex, ScrollI2c>;

static SCROLL: StaticCell<Scroll> = StaticCell::new();

/// Latest button edge, handed from the polling task to `main`. Handlers run
/// synchronously, so the LED write happens here instead of in the handler.
static BUTTON_EDGES: Signal<CriticalSectionRawMutex, bool> = Signal::new();

fn on_button(pressed: bool) {
    BUTTON_EDGES.signal(pressed);
}

fn on_encoder_change(value: i16, delta: i16) {
    info!("v: {} d: {}", value, delta);
}

/// Thin wrapper that monomorphises the generic event loop so it can be
/// spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn scroll_task(unit: &'static Scroll) {
    unit.run(&PollConfig::default()).await;
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        Irqs,
        i2c::Config::default(),
    );

    let unit: &'static Scroll = SCROLL.init(ScrollUnit::new(i2c, DEFAULT_ADDRESS));

    match unit.read_firmware_version().await {
        Ok(version) => info!("Unit Scroll firmware v{}", version),
        Err(e) => error!("Firmware version read failed: {}", e),
    }

    if let Err(e) = unit.turn_led_off().await {
        error!("LED off failed: {}", e);
    }

    unit.on_encoder_change(&on_encoder_change);
    unit.on_button(&on_button);

    spawner.spawn(scroll_task(unit)).unwrap();

    info!("Scroll demo started, turn or press the knob");

    loop {
        let color = if BUTTON_EDGES.wait().await {
            0xFF0000
        } else {
            0x00FF00
        };

        if let Err(e) = unit.set_led_color(color).await {
            error!("LED write failed: {}", e);
        }
    }
}
