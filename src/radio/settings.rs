//! Logical tuner settings
//!
//! The user-facing settings mirrored by the driver, and the pure encoders
//! that place them into a register file. The driver stages these encoders
//! on a copy of its mirror and commits only after the bus write succeeds.

use crate::config::{
    DEFAULT_SEEK_SENSITIVITY, DEFAULT_SOFTMUTE_ATTENUATION, DEFAULT_SOFTMUTE_RATE, MAX_VOLUME,
    MAX_VOLUME_LEVEL,
};
use crate::drivers::si470x::registers::{Field, RegisterFile};
use crate::types::{
    Deemphasis, RegionConfig, SeekSensitivity, SoftmuteAttenuation, SoftmuteRate,
};

/// Logical settings shadowed by the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TunerSettings {
    /// Seek sensitivity
    pub seek_sensitivity: SeekSensitivity,
    /// Audio muted
    pub mute: bool,
    /// Softmute enabled
    pub softmute: bool,
    /// Softmute attack/recover rate
    pub softmute_rate: SoftmuteRate,
    /// Softmute attenuation
    pub softmute_attenuation: SoftmuteAttenuation,
    /// Forced mono
    pub mono: bool,
    /// Native volume, 0-15
    pub volume: u8,
    /// Extended (-30 dBFS) volume range
    pub volume_extended: bool,
}

impl TunerSettings {
    /// Power-on defaults: muted, softmute on, recommended seek
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seek_sensitivity: DEFAULT_SEEK_SENSITIVITY,
            mute: true,
            softmute: true,
            softmute_rate: DEFAULT_SOFTMUTE_RATE,
            softmute_attenuation: DEFAULT_SOFTMUTE_ATTENUATION,
            mono: false,
            volume: 0,
            volume_extended: false,
        }
    }

    /// Volume on the continuous 0-30 scale
    #[must_use]
    pub const fn volume_level(&self) -> u8 {
        native_to_volume_level(self.volume, self.volume_extended)
    }
}

impl Default for TunerSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TunerSettings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Settings(vol={}{}, mute={}, mono={}, seek={})",
            self.volume,
            if self.volume_extended { "x" } else { "" },
            self.mute,
            self.mono,
            self.seek_sensitivity
        );
    }
}

/// Map a continuous volume level (0-30) to native volume and VOLEXT
///
/// Levels 0-15 use the extended (quiet) range, 16-30 the normal range
/// starting at native 1, so no loudness is reachable twice.
#[must_use]
pub const fn volume_level_to_native(level: u8) -> (u8, bool) {
    let level = if level > MAX_VOLUME_LEVEL {
        MAX_VOLUME_LEVEL
    } else {
        level
    };
    if level <= MAX_VOLUME {
        (level, true)
    } else {
        (level - MAX_VOLUME, false)
    }
}

/// Map native volume and VOLEXT back to the continuous scale
#[must_use]
pub const fn native_to_volume_level(volume: u8, extended: bool) -> u8 {
    let volume = if volume > MAX_VOLUME { MAX_VOLUME } else { volume };
    if extended || volume == 0 {
        volume
    } else {
        volume + MAX_VOLUME
    }
}

/// Encode seek thresholds into SYSCONFIG2/SYSCONFIG3
pub fn encode_seek_sensitivity(regs: &mut RegisterFile, sensitivity: SeekSensitivity) {
    let thresholds = sensitivity.thresholds();
    regs.set_field(Field::SEEKTH, thresholds.rssi);
    regs.set_field(Field::SKSNR, thresholds.snr);
    regs.set_field(Field::SKCNT, thresholds.impulse_count);
}

/// Encode native volume (clamped to 15) and VOLEXT
pub fn encode_volume(regs: &mut RegisterFile, volume: u8, extended: bool) {
    regs.set_field(Field::VOLUME, u16::from(volume.min(MAX_VOLUME)));
    regs.set_flag(Field::VOLEXT, extended);
}

/// Encode band, spacing and de-emphasis
pub fn encode_region(regs: &mut RegisterFile, config: &RegionConfig) {
    regs.set_flag(Field::DE, config.deemphasis == Deemphasis::Us50);
    regs.set_field(Field::BAND, config.band.as_reg());
    regs.set_field(Field::SPACE, config.spacing.as_reg());
}

/// Encode every logical setting for the cold bring-up batch write
pub fn apply_all(
    regs: &mut RegisterFile,
    settings: &TunerSettings,
    config: &RegionConfig,
    rds: bool,
) {
    regs.set_flag(Field::MONO, settings.mono);
    regs.set_flag(Field::DMUTE, !settings.mute);
    regs.set_flag(Field::DSMUTE, !settings.softmute);
    if rds {
        regs.set_flag(Field::RDS, true);
    }
    encode_region(regs, config);
    encode_volume(regs, settings.volume, settings.volume_extended);
    regs.set_field(Field::SMUTEA, settings.softmute_attenuation.as_reg());
    regs.set_field(Field::SMUTER, settings.softmute_rate.as_reg());
    encode_seek_sensitivity(regs, settings.seek_sensitivity);
}
