//! Hardware Abstraction Layer
//!
//! Thin seams between the tuner driver and the platform: a blocking I2C
//! bus bound to the chip address, the reset/SDIO lines needed for bus mode
//! selection, and a monotonic clock for task deadlines.

pub mod gpio;
pub mod i2c;
pub mod timer;
