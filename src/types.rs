//! Shared types used across the tuner firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;
#[cfg(not(feature = "std"))]
use micromath::F32Ext;

/// FM frequency with kHz resolution
///
/// Stored as an integer so channel grid arithmetic is exact for every
/// supported spacing (50, 100 and 200 kHz).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Create a frequency from kHz
    #[must_use]
    pub const fn from_khz(khz: u32) -> Self {
        Self(khz)
    }

    /// Create a frequency from MHz, rounded to the nearest kHz
    ///
    /// Negative and non-finite inputs map to 0 kHz.
    #[must_use]
    pub fn from_mhz(mhz: f32) -> Self {
        let khz = (mhz * 1000.0).round();
        if khz.is_finite() && khz > 0.0 {
            Self(khz as u32)
        } else {
            Self(0)
        }
    }

    /// Get the frequency in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0
    }

    /// Get the frequency in MHz as floating point
    #[must_use]
    pub fn as_mhz_f32(self) -> f32 {
        self.0 as f32 / 1000.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} kHz)", self.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} MHz", self.0 / 1000, (self.0 % 1000) / 10)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}.{:02} MHz", self.0 / 1000, (self.0 % 1000) / 10);
    }
}

/// FM frequency band
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Band {
    /// 87.5 - 108 MHz
    #[default]
    Common,
    /// 76 - 108 MHz
    JapanWide,
    /// 76 - 90 MHz
    Japan,
}

impl Band {
    /// BAND field encoding
    #[must_use]
    pub const fn as_reg(self) -> u16 {
        match self {
            Self::Common => 0,
            Self::JapanWide => 1,
            Self::Japan => 2,
        }
    }

    /// Lower band edge
    #[must_use]
    pub const fn bottom(self) -> Frequency {
        match self {
            Self::Common => Frequency::from_khz(87_500),
            Self::JapanWide | Self::Japan => Frequency::from_khz(76_000),
        }
    }

    /// Upper band edge
    #[must_use]
    pub const fn top(self) -> Frequency {
        match self {
            Self::Common | Self::JapanWide => Frequency::from_khz(108_000),
            Self::Japan => Frequency::from_khz(90_000),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Common => defmt::write!(f, "87.5-108"),
            Self::JapanWide => defmt::write!(f, "76-108"),
            Self::Japan => defmt::write!(f, "76-90"),
        }
    }
}

/// Distance between adjacent FM channels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChannelSpacing {
    /// 200 kHz (Americas, South Korea, Australia)
    #[default]
    Khz200,
    /// 100 kHz (Europe, Japan)
    Khz100,
    /// 50 kHz (Italy)
    Khz50,
}

impl ChannelSpacing {
    /// SPACE field encoding
    #[must_use]
    pub const fn as_reg(self) -> u16 {
        match self {
            Self::Khz200 => 0,
            Self::Khz100 => 1,
            Self::Khz50 => 2,
        }
    }

    /// Spacing in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        match self {
            Self::Khz200 => 200,
            Self::Khz100 => 100,
            Self::Khz50 => 50,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChannelSpacing {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}kHz", self.as_khz());
    }
}

/// FM de-emphasis time constant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Deemphasis {
    /// 75 µs (Americas, South Korea)
    #[default]
    Us75,
    /// 50 µs (Europe, Japan, Australia)
    Us50,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Deemphasis {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Us75 => defmt::write!(f, "75us"),
            Self::Us50 => defmt::write!(f, "50us"),
        }
    }
}

/// Regional FM settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionConfig {
    /// Frequency band
    pub band: Band,
    /// Channel spacing
    pub spacing: ChannelSpacing,
    /// De-emphasis
    pub deemphasis: Deemphasis,
}

impl RegionConfig {
    /// Create a regional configuration
    #[must_use]
    pub const fn new(band: Band, spacing: ChannelSpacing, deemphasis: Deemphasis) -> Self {
        Self {
            band,
            spacing,
            deemphasis,
        }
    }

    /// Americas
    #[must_use]
    pub const fn usa() -> Self {
        Self::new(Band::Common, ChannelSpacing::Khz200, Deemphasis::Us75)
    }

    /// Europe
    #[must_use]
    pub const fn europe() -> Self {
        Self::new(Band::Common, ChannelSpacing::Khz100, Deemphasis::Us50)
    }

    /// Japan, wide band
    #[must_use]
    pub const fn japan_wide() -> Self {
        Self::new(Band::JapanWide, ChannelSpacing::Khz100, Deemphasis::Us50)
    }

    /// Japan
    #[must_use]
    pub const fn japan() -> Self {
        Self::new(Band::Japan, ChannelSpacing::Khz100, Deemphasis::Us50)
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::usa()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegionConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Region({}, {}, {})", self.band, self.spacing, self.deemphasis);
    }
}

/// Seek thresholds written to SEEKTH, SKSNR and SKCNT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeekThresholds {
    /// RSSI seek threshold
    pub rssi: u16,
    /// SNR threshold
    pub snr: u16,
    /// FM impulse detection threshold
    pub impulse_count: u16,
}

/// Station qualification used during seek (AN230 seek recommendations)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekSensitivity {
    /// Finds only strong stations
    StrongOnly,
    /// Default sensitivity
    #[default]
    Recommended,
    /// Finds stations with lower RSSI
    More,
    /// Finds most valid stations
    Most,
}

impl SeekSensitivity {
    /// Register thresholds for this sensitivity
    #[must_use]
    pub const fn thresholds(self) -> SeekThresholds {
        let (rssi, snr, impulse_count) = match self {
            Self::StrongOnly => (0x0C, 0x7, 0xF),
            Self::Recommended => (0x19, 0x4, 0x8),
            Self::More => (0x0C, 0x4, 0x8),
            Self::Most => (0x00, 0x4, 0xF),
        };
        SeekThresholds {
            rssi,
            snr,
            impulse_count,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SeekSensitivity {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::StrongOnly => defmt::write!(f, "strong-only"),
            Self::Recommended => defmt::write!(f, "recommended"),
            Self::More => defmt::write!(f, "more"),
            Self::Most => defmt::write!(f, "most"),
        }
    }
}

/// Seek direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekDirection {
    /// Towards the lower band edge
    Down,
    /// Towards the upper band edge
    Up,
}

#[cfg(feature = "embedded")]
impl defmt::Format for SeekDirection {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Down => defmt::write!(f, "down"),
            Self::Up => defmt::write!(f, "up"),
        }
    }
}

/// Volume reduction applied by softmute when off-station
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SoftmuteAttenuation {
    /// 16 dB
    #[default]
    Db16,
    /// 14 dB
    Db14,
    /// 12 dB
    Db12,
    /// 10 dB
    Db10,
}

impl SoftmuteAttenuation {
    /// SMUTEA field encoding
    #[must_use]
    pub const fn as_reg(self) -> u16 {
        match self {
            Self::Db16 => 0,
            Self::Db14 => 1,
            Self::Db12 => 2,
            Self::Db10 => 3,
        }
    }
}

/// How quickly softmute attenuation is applied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SoftmuteRate {
    /// Fastest
    #[default]
    Fastest,
    /// Fast
    Fast,
    /// Slow
    Slow,
    /// Slowest
    Slowest,
}

impl SoftmuteRate {
    /// SMUTER field encoding
    #[must_use]
    pub const fn as_reg(self) -> u16 {
        match self {
            Self::Fastest => 0,
            Self::Fast => 1,
            Self::Slow => 2,
            Self::Slowest => 3,
        }
    }
}

/// Manufacturer and part number (register 00h)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct DeviceId {
    /// Manufacturer ID (0x242 for Silicon Labs)
    pub manufacturer: u16,
    /// Part number
    pub part: u8,
}

/// Chip revision information (register 01h)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub struct ChipId {
    /// Firmware version
    pub firmware: u8,
    /// Device variant
    pub device: u8,
    /// Chip revision
    pub revision: u8,
}

impl ChipId {
    /// Resolve the device variant, if supported
    #[must_use]
    pub const fn variant(&self) -> Option<DeviceVariant> {
        DeviceVariant::from_dev(self.device)
    }
}

/// Supported chip variants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceVariant {
    /// Si4702, no RDS
    Si4702,
    /// Si4703, with RDS
    Si4703,
}

impl DeviceVariant {
    /// Match the DEV field of CHIPID
    #[must_use]
    pub const fn from_dev(dev: u8) -> Option<Self> {
        match dev {
            0b0001 => Some(Self::Si4702),
            0b1001 => Some(Self::Si4703),
            _ => None,
        }
    }

    /// Whether the variant decodes RDS
    #[must_use]
    pub const fn supports_rds(self) -> bool {
        matches!(self, Self::Si4703)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DeviceVariant {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Si4702 => defmt::write!(f, "Si4702"),
            Self::Si4703 => defmt::write!(f, "Si4703"),
        }
    }
}
