//! Si4702/Si4703 FM Tuner Firmware Library
//!
//! Register-level driver for the Silicon Labs Si4702/Si4703 single-chip FM
//! receivers on a 2-wire bus. The driver owns the authoritative shadow copy
//! of the chip registers, sequences power-up and power-down with the vendor
//! timings, and runs tuning and seeking as cooperative tasks that the caller
//! advances with `task_tick`, so a several-second seek never blocks a
//! firmware main loop.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       RADIO HANDLE                           │
//! │  Si470x: setters  │  power sequencer  │  tune/seek tasks     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RADIO LOGIC                             │
//! │  Channel codec  │  Settings encoders  │  Task slot           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  Register transport  │  I2C  │  Reset pins  │  Clock         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    PLATFORM TRAITS                           │
//! │        embedded-hal 1.0 (I2c, OutputPin, DelayNs)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use si470x_firmware::prelude::*;
//!
//! let mut radio = Si470x::new(i2c, pins, delay, clock, true);
//! radio.power_up(RegionConfig::europe())?;
//! radio.set_volume_level(20)?;
//! radio.set_mute(false)?;
//! radio.seek_async(SeekDirection::Up)?;
//! loop {
//!     if let Progress::Done(outcome) = radio.task_tick()? {
//!         break;
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Bus, pin and clock seams over `embedded-hal`.
pub mod hal;

/// Peripheral Drivers
///
/// The Si470x radio handle and its register transport.
pub mod drivers;

/// Radio Control Logic
///
/// Pure channel arithmetic, settings encoding and task bookkeeping.
pub mod radio;

/// Power Management
///
/// Power states and warm/cold path selection.
pub mod power;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Driver errors
pub mod error;

pub use drivers::si470x::rds::RdsGroup;
pub use drivers::si470x::Si470x;
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::drivers::si470x::rds::RdsGroup;
    pub use crate::drivers::si470x::Si470x;
    pub use crate::error::{Error, Result};
    pub use crate::hal::gpio::{BusPins, ResetLines};
    pub use crate::hal::timer::Clock;
    pub use crate::power::PowerState;
    pub use crate::radio::channel::FrequencyRange;
    pub use crate::radio::task::{Progress, TaskOutcome};

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal::i2c::I2c;

    #[cfg(feature = "embedded")]
    pub use crate::hal::timer::{EmbassyClock, EmbassyDelay};
    #[cfg(feature = "std")]
    pub use crate::hal::timer::{StdClock, StdDelay};
}
