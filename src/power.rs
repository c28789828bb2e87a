//! Power Management
//!
//! Tuner power states and the choice between a warm resume and a full
//! cold bring-up.

use crate::drivers::si470x::registers::{Field, RegisterFile};
use crate::types::RegionConfig;

/// Tuner power state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PowerState {
    /// Off, or never powered
    #[default]
    PoweredDown,
    /// Power-up sequence running
    PoweringUp,
    /// Receiving
    PoweredUp,
    /// Power-down sequence running
    PoweringDown,
}

impl PowerState {
    /// Check for a sequencing state
    #[must_use]
    pub const fn is_transitioning(self) -> bool {
        matches!(self, Self::PoweringUp | Self::PoweringDown)
    }

    /// Settled state matching the ENABLE bit
    #[must_use]
    pub const fn settled(enabled: bool) -> Self {
        if enabled {
            Self::PoweredUp
        } else {
            Self::PoweredDown
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::PoweredDown => defmt::write!(f, "OFF"),
            Self::PoweringUp => defmt::write!(f, "UP.."),
            Self::PoweredUp => defmt::write!(f, "ON"),
            Self::PoweringDown => defmt::write!(f, "DOWN.."),
        }
    }
}

/// Power-up sequence to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerPath {
    /// Chip registers survived a soft power-down; re-enable only
    WarmResume,
    /// Reset pulse, identity check and full register setup
    ColdBoot,
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerPath {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::WarmResume => defmt::write!(f, "warm"),
            Self::ColdBoot => defmt::write!(f, "cold"),
        }
    }
}

/// Pick the power-up path
///
/// Warm resume requires DISABLE in the mirror (left there by a power-down)
/// and a requested region identical to the previously active one; band and
/// spacing changes need the full setup.
#[must_use]
pub fn select_path(
    regs: &RegisterFile,
    previous: &RegionConfig,
    requested: &RegionConfig,
) -> PowerPath {
    if regs.flag(Field::DISABLE) && previous == requested {
        PowerPath::WarmResume
    } else {
        PowerPath::ColdBoot
    }
}
