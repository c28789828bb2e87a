//! I2C Bus Abstractions
//!
//! Thin blocking wrapper over an `embedded-hal` I2C implementation.
//! Transfers block the caller for the duration of the bus transaction,
//! which is part of the cooperative model of the tuner driver.

use embedded_hal::i2c::{Error as _, I2c};

use crate::config::SI470X_I2C_ADDR;
use crate::error::{Error, Result};

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Si4702/03 tuner address
    pub const SI470X: Self = Self(SI470X_I2C_ADDR);

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{=u8:x}", self.0);
    }
}

/// I2C bus bound to a single device
pub struct I2cBus<I> {
    i2c: I,
    addr: I2cAddress,
}

impl<I: I2c> I2cBus<I> {
    /// Create a new bus wrapper for `addr`
    #[must_use]
    pub fn new(i2c: I, addr: I2cAddress) -> Self {
        Self { i2c, addr }
    }

    /// Write bytes to the device
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.i2c
            .write(self.addr.addr(), data)
            .map_err(|e| Error::I2c(e.kind()))
    }

    /// Read bytes from the device
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .read(self.addr.addr(), buffer)
            .map_err(|e| Error::I2c(e.kind()))
    }

    /// Give back the underlying bus
    pub fn release(self) -> I {
        self.i2c
    }
}
