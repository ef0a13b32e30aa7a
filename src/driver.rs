//! Low-level register protocol.
//!
//! Every register transfer is addressed by a single offset byte. Writes go
//! out as one transaction (`[offset, payload..]`); reads are a register-select
//! write followed by a separate read transaction.
//!
//! This module is crate-private. Consumers go through
//! [`ScrollUnit`](crate::ScrollUnit), which serialises access to the driver.

use embedded_hal_async::i2c::I2c;

use crate::error::ScrollError;
use crate::registers::MAX_PAYLOAD_LEN;

/// Register protocol driver for one Unit Scroll on the bus.
pub(crate) struct ScrollDriver<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> ScrollDriver<I2C>
where
    I2C: I2c,
{
    /// Create a new driver.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (typically 0x40)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Point subsequent transactions at a different device address.
    pub fn set_address(&mut self, address: u8) {
        self.address = address;
    }

    /// Give back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Write `payload` to the register at `offset` in one transaction.
    ///
    /// `payload` must not exceed [`MAX_PAYLOAD_LEN`] bytes.
    pub async fn write_register(
        &mut self,
        offset: u8,
        payload: &[u8],
    ) -> Result<(), ScrollError<I2C::Error>> {
        debug_assert!(payload.len() <= MAX_PAYLOAD_LEN);

        // [offset, p0, p1, ...]
        let mut buf = [0u8; MAX_PAYLOAD_LEN + 1];
        buf[0] = offset;
        buf[1..=payload.len()].copy_from_slice(payload);

        self.i2c.write(self.address, &buf[..=payload.len()]).await?;

        Ok(())
    }

    /// Select the register at `offset`, then read `buffer.len()` bytes from it.
    ///
    /// The two phases are separate transactions rather than a repeated-start
    /// `write_read()`; the unit latches the selected offset between them.
    pub async fn read_register(
        &mut self,
        offset: u8,
        buffer: &mut [u8],
    ) -> Result<(), ScrollError<I2C::Error>> {
        self.i2c.write(self.address, &[offset]).await?;
        self.i2c.read(self.address, buffer).await?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Typed read/write helpers
    // -----------------------------------------------------------------------

    pub async fn read_u8(&mut self, offset: u8) -> Result<u8, ScrollError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.read_register(offset, &mut buf).await?;
        Ok(buf[0])
    }

    /// Read a 16-bit signed little-endian value.
    pub async fn read_i16(&mut self, offset: u8) -> Result<i16, ScrollError<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.read_register(offset, &mut buf).await?;
        Ok(i16::from_le_bytes(buf))
    }

    pub async fn write_u8(
        &mut self,
        offset: u8,
        value: u8,
    ) -> Result<(), ScrollError<I2C::Error>> {
        self.write_register(offset, &[value]).await
    }

    /// Write a 16-bit signed value, low byte first.
    pub async fn write_i16(
        &mut self,
        offset: u8,
        value: i16,
    ) -> Result<(), ScrollError<I2C::Error>> {
        self.write_register(offset, &value.to_le_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::mock::{MockScroll, Transaction};
    use crate::registers::{DEFAULT_ADDRESS, ENCODER, RGB_LED};

    #[test]
    fn write_register_prefixes_offset() {
        let mut driver = ScrollDriver::new(MockScroll::new(), DEFAULT_ADDRESS);
        block_on(driver.write_register(RGB_LED, &[0x00, 0x12, 0x34, 0x56])).unwrap();

        assert_eq!(
            driver.release().transactions(),
            vec![Transaction::write(DEFAULT_ADDRESS, &[0x30, 0x00, 0x12, 0x34, 0x56])]
        );
    }

    #[test]
    fn read_register_selects_then_reads() {
        let mut mock = MockScroll::new();
        mock.script_read(ENCODER, &[0x34, 0x12]);
        let mut driver = ScrollDriver::new(mock, DEFAULT_ADDRESS);

        let value = block_on(driver.read_i16(ENCODER)).unwrap();
        assert_eq!(value, 0x1234);

        assert_eq!(
            driver.release().transactions(),
            vec![
                Transaction::write(DEFAULT_ADDRESS, &[ENCODER]),
                Transaction::read(DEFAULT_ADDRESS, 2),
            ]
        );
    }

    #[test]
    fn read_i16_is_signed() {
        let mut mock = MockScroll::new();
        mock.script_read(ENCODER, &[0xFE, 0xFF]);
        let mut driver = ScrollDriver::new(mock, DEFAULT_ADDRESS);

        assert_eq!(block_on(driver.read_i16(ENCODER)).unwrap(), -2);
    }

    #[test]
    fn failed_select_skips_read_phase() {
        let mut mock = MockScroll::new();
        mock.fail_next_write();
        let mut driver = ScrollDriver::new(mock, DEFAULT_ADDRESS);

        assert!(matches!(
            block_on(driver.read_u8(ENCODER)),
            Err(ScrollError::I2c(_))
        ));
        // Only the failed select was attempted.
        assert_eq!(driver.release().transactions().len(), 1);
    }
}
