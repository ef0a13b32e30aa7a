//! Register map of the Unit Scroll firmware.
//!
//! Every register is addressed by a single offset byte on the device's I2C
//! address. Multi-byte values are little-endian (low byte on the wire first).

// ---------------------------------------------------------------------------
// Encoder / button / LED registers
// ---------------------------------------------------------------------------

/// Absolute encoder position (16-bit signed, read/write).
pub const ENCODER: u8 = 0x10;

/// Button status (1 byte, read-only). `0x00` means pressed.
pub const BUTTON: u8 = 0x20;

/// RGB LED (4 bytes, write-only): `[index, red, green, blue]`.
pub const RGB_LED: u8 = 0x30;

/// Encoder reset (1 byte, write-only). Writing `1` resets the encoder.
pub const RESET: u8 = 0x40;

/// Incremental encoder counter (16-bit signed, read-only).
pub const INC_ENCODER: u8 = 0x50;

// ---------------------------------------------------------------------------
// System registers
// ---------------------------------------------------------------------------

/// Bootloader version (1 byte, read-only).
pub const BOOTLOADER_VERSION: u8 = 0xFC;

/// Jump to bootloader (write-only). Not exposed by the driver.
#[allow(dead_code)]
pub const JUMP_TO_BOOTLOADER: u8 = 0xFD;

/// Firmware version (1 byte, read-only).
pub const FIRMWARE_VERSION: u8 = 0xFE;

/// Device I2C address (1 byte, read/write).
pub const I2C_ADDRESS: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Widths and protocol constants
// ---------------------------------------------------------------------------

/// Width in bytes of the encoder registers.
pub const ENCODER_LEN: usize = 2;

/// Width in bytes of the RGB LED register.
pub const RGB_LED_LEN: usize = 4;

/// Largest payload any writable register accepts.
pub const MAX_PAYLOAD_LEN: usize = RGB_LED_LEN;

/// LED index byte sent ahead of the colour channels. The unit has one LED.
pub const LED_INDEX: u8 = 0x00;

/// Status byte reported by the button register while the button is held.
pub const BUTTON_PRESSED: u8 = 0x00;

/// Default I2C address of the Unit Scroll.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Lowest assignable 7-bit address (0x00..=0x07 are reserved).
pub const MIN_ADDRESS: u8 = 0x08;

/// Highest assignable 7-bit address (0x78..=0x7F are reserved).
pub const MAX_ADDRESS: u8 = 0x77;
