//! Error types for the scroll driver.

use core::fmt;

/// Errors that can occur when communicating with the Unit Scroll.
#[derive(Debug, PartialEq, Eq)]
pub enum ScrollError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Requested device address is outside the assignable 7-bit range
    /// (0x08-0x77).
    InvalidAddress(u8),
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for ScrollError<E> {
    fn from(error: E) -> Self {
        ScrollError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for ScrollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScrollError::I2c(e) => write!(f, "I2C error: {:?}", e),
            ScrollError::InvalidAddress(addr) => {
                write!(f, "Invalid I2C address 0x{:02X} (must be 0x08-0x77)", addr)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ScrollError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ScrollError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            ScrollError::InvalidAddress(addr) => {
                defmt::write!(f, "Invalid I2C address {=u8:#x}", *addr)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_address() {
        let err: ScrollError<()> = ScrollError::InvalidAddress(0x7F);
        assert_eq!(
            format!("{}", err),
            "Invalid I2C address 0x7F (must be 0x08-0x77)"
        );
    }

    #[test]
    fn raw_bus_error_converts() {
        let err: ScrollError<u8> = 3u8.into();
        assert_eq!(err, ScrollError::I2c(3));
    }
}
