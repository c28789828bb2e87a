//! Frequency / channel conversion
//!
//! Pure mapping between frequencies and the chip's channel index for a
//! given band and channel spacing.

use crate::types::{Band, ChannelSpacing, Frequency};

/// Frequency range and grid of a band/spacing pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyRange {
    /// Lower band edge (channel 0)
    pub bottom: Frequency,
    /// Upper band edge
    pub top: Frequency,
    /// Channel spacing
    pub spacing: ChannelSpacing,
}

impl FrequencyRange {
    /// Range for a band and spacing
    #[must_use]
    pub const fn new(band: Band, spacing: ChannelSpacing) -> Self {
        Self {
            bottom: band.bottom(),
            top: band.top(),
            spacing,
        }
    }

    /// Grid step in kHz
    #[must_use]
    pub const fn step_khz(&self) -> u32 {
        self.spacing.as_khz()
    }

    /// Check if `frequency` lies within the band edges
    #[must_use]
    pub fn contains(&self, frequency: Frequency) -> bool {
        frequency >= self.bottom && frequency <= self.top
    }

    /// Highest channel that still lies within the band
    #[must_use]
    pub fn top_channel(&self) -> u16 {
        let span = self.top.as_khz().saturating_sub(self.bottom.as_khz());
        u16::try_from(span / self.step_khz()).unwrap_or(u16::MAX)
    }

    /// Number of channels from bottom to top inclusive
    #[must_use]
    pub fn channel_count(&self) -> u16 {
        self.top_channel().saturating_add(1)
    }

    /// Nearest channel to `frequency`
    ///
    /// Rounds half away from zero. Out-of-band input is not clamped to the
    /// band; results only saturate at the bounds of `u16`.
    #[must_use]
    pub fn frequency_to_channel(&self, frequency: Frequency) -> u16 {
        let step = i64::from(self.step_khz());
        let offset = i64::from(frequency.as_khz()) - i64::from(self.bottom.as_khz());
        let channel = if offset >= 0 {
            (offset + step / 2) / step
        } else {
            -((-offset + step / 2) / step)
        };
        u16::try_from(channel.max(0)).unwrap_or(u16::MAX)
    }

    /// Frequency of channel `channel`
    #[must_use]
    pub fn channel_to_frequency(&self, channel: u16) -> Frequency {
        Frequency::from_khz(u32::from(channel) * self.step_khz() + self.bottom.as_khz())
    }

    /// Snap `frequency` to the nearest channel of the grid
    #[must_use]
    pub fn snap(&self, frequency: Frequency) -> Frequency {
        self.channel_to_frequency(self.frequency_to_channel(frequency))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrequencyRange {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}..{} step {}", self.bottom, self.top, self.spacing);
    }
}

/// Nearest channel to `frequency` in `range`
#[must_use]
pub fn frequency_to_channel(frequency: Frequency, range: &FrequencyRange) -> u16 {
    range.frequency_to_channel(frequency)
}

/// Frequency of `channel` in `range`
#[must_use]
pub fn channel_to_frequency(channel: u16, range: &FrequencyRange) -> Frequency {
    range.channel_to_frequency(channel)
}
