//! GPIO Abstractions
//!
//! Pins used by the tuner bring-up sequence. The Si470x selects its bus
//! mode from the SDIO level on the rising edge of RESET, so before the
//! first transfer SDIO is driven low as a plain GPIO and only afterwards
//! handed to the I2C peripheral.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};

/// Reset and bus-pin control needed by a cold bring-up
pub trait BusPins {
    /// Configure SDIO as a GPIO output and drive it low
    fn hold_sdio_low(&mut self) -> Result<()>;

    /// Drive the RESET line
    fn set_reset(&mut self, high: bool) -> Result<()>;

    /// Return SDIO/SCLK to the I2C function, optionally with internal pull-ups
    fn attach_bus(&mut self, pull_ups: bool) -> Result<()>;
}

/// [`BusPins`] built from two output pins and a pin-mux hook
///
/// `attach` is called with the pull-up flag once the reset pulse is done;
/// boards that route SDIO through a dedicated GPIO can pass a no-op.
pub struct ResetLines<R, S, F> {
    reset: R,
    sdio: S,
    attach: F,
}

impl<R, S, F> ResetLines<R, S, F>
where
    R: OutputPin,
    S: OutputPin,
    F: FnMut(bool),
{
    /// Create from the reset pin, the SDIO pin and the mux hook
    pub fn new(reset: R, sdio: S, attach: F) -> Self {
        Self {
            reset,
            sdio,
            attach,
        }
    }

    /// Give back the pins
    pub fn release(self) -> (R, S) {
        (self.reset, self.sdio)
    }
}

impl<R, S, F> BusPins for ResetLines<R, S, F>
where
    R: OutputPin,
    S: OutputPin,
    F: FnMut(bool),
{
    fn hold_sdio_low(&mut self) -> Result<()> {
        self.sdio.set_low().map_err(|_| Error::Pin)
    }

    fn set_reset(&mut self, high: bool) -> Result<()> {
        if high {
            self.reset.set_high().map_err(|_| Error::Pin)
        } else {
            self.reset.set_low().map_err(|_| Error::Pin)
        }
    }

    fn attach_bus(&mut self, pull_ups: bool) -> Result<()> {
        (self.attach)(pull_ups);
        Ok(())
    }
}
