//! System configuration and hardware constants
//!
//! Compile-time constants for the tuner: bus address, vendor timing
//! requirements (AN230), poll cadence and the caps that bound every wait.

use crate::types::{SeekSensitivity, SoftmuteAttenuation, SoftmuteRate};

/// Si4702/03 I2C address
pub const SI470X_I2C_ADDR: u8 = 0x10;

/// Expected manufacturer ID (Silicon Labs)
pub const MANUFACTURER_ID: u16 = 0x242;

/// Expected part number
pub const PART_NUMBER: u8 = 0x1;

/// Reset low / high hold time during bus-mode selection
pub const RESET_HOLD_MS: u32 = 5;

/// Crystal oscillator stabilization time
pub const OSCILLATOR_SETTLE_MS: u32 = 500;

/// Device power-up time after setting ENABLE
pub const POWERUP_SETTLE_MS: u32 = 110;

/// Status poll interval while tuning
pub const TUNE_POLL_INTERVAL_MS: u32 = 20;

/// Status poll interval while seeking
///
/// Coarse so bus traffic does not disturb the weak-signal search.
pub const SEEK_POLL_INTERVAL_MS: u32 = 200;

/// Polls before a tune is declared stalled (datasheet worst case 60 ms)
pub const MAX_TUNE_POLLS: u16 = 10;

/// Worst-case seek time per channel visited (datasheet 60 ms)
pub const SEEK_CHANNEL_TIME_MS: u32 = 60;

/// Polls allowed on top of a full band wrap before a seek is declared stalled
pub const SEEK_POLL_MARGIN: u16 = 10;

/// Maximum status reads while waiting for STC to clear after a stop
pub const STOP_SPIN_LIMIT: u16 = 64;

/// Time budget for the STC-clear spin (datasheet worst case 1.5 ms)
pub const STOP_SPIN_BUDGET_US: u64 = 5_000;

/// Consecutive bus failures tolerated inside a running task
pub const MAX_CONSECUTIVE_BUS_ERRORS: u8 = 3;

/// Suggested RDS poll interval; a group arrives roughly every 87 ms
pub const RDS_POLL_INTERVAL_MS: u32 = 40;

/// Highest native volume step
pub const MAX_VOLUME: u8 = 15;

/// Highest level on the continuous volume scale
pub const MAX_VOLUME_LEVEL: u8 = 30;

/// Default seek sensitivity
pub const DEFAULT_SEEK_SENSITIVITY: SeekSensitivity = SeekSensitivity::Recommended;

/// Default softmute rate
pub const DEFAULT_SOFTMUTE_RATE: SoftmuteRate = SoftmuteRate::Fastest;

/// Default softmute attenuation
pub const DEFAULT_SOFTMUTE_ATTENUATION: SoftmuteAttenuation = SoftmuteAttenuation::Db16;
