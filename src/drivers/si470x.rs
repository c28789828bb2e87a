//! Si4702/Si4703 FM tuner driver
//!
//! [`Si470x`] owns the bus, the reset lines, a delay provider and a clock,
//! and keeps the authoritative shadow copy of the chip registers. Every
//! public operation takes `&mut self`, which is the whole concurrency
//! story: one caller, one handle, no locks.
//!
//! Settings are applied by staging a copy of the mirror, writing it and
//! committing the copy only after the bus accepted it, so the mirror and the
//! logical settings never disagree with what the chip was told.

pub mod power;
pub mod rds;
pub mod registers;
pub mod tasks;
pub mod transport;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use self::registers::{Field, Register, RegisterFile};
use crate::error::{Error, Result};
use crate::hal::gpio::BusPins;
use crate::hal::i2c::{I2cAddress, I2cBus};
use crate::hal::timer::Clock;
use crate::power::PowerState;
use crate::radio::channel::FrequencyRange;
use crate::radio::settings::{self, TunerSettings};
use crate::radio::task::TaskSlot;
use crate::types::{
    ChipId, DeviceId, DeviceVariant, Frequency, RegionConfig, SeekSensitivity,
    SoftmuteAttenuation, SoftmuteRate,
};

/// Si470x radio handle
pub struct Si470x<I2C, P, D, C> {
    bus: I2cBus<I2C>,
    pins: P,
    delay: D,
    clock: C,
    pull_ups: bool,
    config: RegionConfig,
    settings: TunerSettings,
    frequency: Option<Frequency>,
    regs: RegisterFile,
    task: TaskSlot,
    state: PowerState,
}

impl<I2C, P, D, C> Si470x<I2C, P, D, C>
where
    I2C: I2c,
    P: BusPins,
    D: DelayNs,
    C: Clock,
{
    /// Create a powered-down handle with default settings
    ///
    /// No bus or pin activity happens until [`Si470x::power_up`].
    pub fn new(i2c: I2C, pins: P, delay: D, clock: C, pull_ups: bool) -> Self {
        Self {
            bus: I2cBus::new(i2c, I2cAddress::SI470X),
            pins,
            delay,
            clock,
            pull_ups,
            config: RegionConfig::usa(),
            settings: TunerSettings::new(),
            frequency: None,
            regs: RegisterFile::new(),
            task: TaskSlot::new(),
            state: PowerState::PoweredDown,
        }
    }

    /// Give back the bus, pins, delay and clock
    pub fn release(self) -> (I2C, P, D, C) {
        (self.bus.release(), self.pins, self.delay, self.clock)
    }

    /// Check if the chip is enabled
    #[must_use]
    pub fn is_powered_up(&self) -> bool {
        self.regs.flag(Field::ENABLE)
    }

    /// Current power state
    #[must_use]
    pub const fn power_state(&self) -> PowerState {
        self.state
    }

    /// Chip revision fields from the mirror
    #[must_use]
    pub fn chip_id(&self) -> ChipId {
        ChipId {
            firmware: field_u8(&self.regs, Field::FIRMWARE),
            device: field_u8(&self.regs, Field::DEV),
            revision: field_u8(&self.regs, Field::REV),
        }
    }

    /// Manufacturer and part number from the mirror
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        DeviceId {
            manufacturer: self.regs.field(Field::MFGID),
            part: field_u8(&self.regs, Field::PN),
        }
    }

    /// Detected chip variant
    #[must_use]
    pub fn variant(&self) -> Option<DeviceVariant> {
        self.chip_id().variant()
    }

    /// Check if the chip decodes RDS
    #[must_use]
    pub fn is_rds_supported(&self) -> bool {
        self.variant().is_some_and(DeviceVariant::supports_rds)
    }

    /// Active region configuration
    #[must_use]
    pub const fn config(&self) -> RegionConfig {
        self.config
    }

    /// Frequency range of the active region
    #[must_use]
    pub const fn frequency_range(&self) -> FrequencyRange {
        FrequencyRange::new(self.config.band, self.config.spacing)
    }

    /// Last known frequency; `None` until the first tune
    #[must_use]
    pub const fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Read-only view of the register mirror
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Logical settings
    #[must_use]
    pub const fn settings(&self) -> &TunerSettings {
        &self.settings
    }

    /// Check if a tune or seek is in progress
    #[must_use]
    pub const fn has_task(&self) -> bool {
        !self.task.is_idle()
    }

    /// Seek sensitivity
    #[must_use]
    pub const fn seek_sensitivity(&self) -> SeekSensitivity {
        self.settings.seek_sensitivity
    }

    /// Set seek sensitivity
    pub fn set_seek_sensitivity(&mut self, sensitivity: SeekSensitivity) -> Result<()> {
        self.ensure_ready()?;
        if self.settings.seek_sensitivity == sensitivity {
            return Ok(());
        }
        self.commit(Register::SysConfig3, |regs| {
            settings::encode_seek_sensitivity(regs, sensitivity);
        })?;
        self.settings.seek_sensitivity = sensitivity;
        debug!("seek sensitivity {}", sensitivity);
        Ok(())
    }

    /// Mute state
    #[must_use]
    pub const fn mute(&self) -> bool {
        self.settings.mute
    }

    /// Mute or unmute audio
    pub fn set_mute(&mut self, mute: bool) -> Result<()> {
        self.ensure_ready()?;
        if self.settings.mute == mute {
            return Ok(());
        }
        self.commit(Register::PowerCfg, |regs| regs.set_flag(Field::DMUTE, !mute))?;
        self.settings.mute = mute;
        Ok(())
    }

    /// Softmute state
    #[must_use]
    pub const fn softmute(&self) -> bool {
        self.settings.softmute
    }

    /// Enable or disable softmute
    pub fn set_softmute(&mut self, softmute: bool) -> Result<()> {
        self.ensure_ready()?;
        if self.settings.softmute == softmute {
            return Ok(());
        }
        self.commit(Register::PowerCfg, |regs| {
            regs.set_flag(Field::DSMUTE, !softmute);
        })?;
        self.settings.softmute = softmute;
        Ok(())
    }

    /// Softmute attack/recover rate
    #[must_use]
    pub const fn softmute_rate(&self) -> SoftmuteRate {
        self.settings.softmute_rate
    }

    /// Set softmute attack/recover rate
    pub fn set_softmute_rate(&mut self, rate: SoftmuteRate) -> Result<()> {
        self.ensure_ready()?;
        if self.settings.softmute_rate == rate {
            return Ok(());
        }
        self.commit(Register::SysConfig3, |regs| {
            regs.set_field(Field::SMUTER, rate.as_reg());
        })?;
        self.settings.softmute_rate = rate;
        Ok(())
    }

    /// Softmute attenuation
    #[must_use]
    pub const fn softmute_attenuation(&self) -> SoftmuteAttenuation {
        self.settings.softmute_attenuation
    }

    /// Set softmute attenuation
    pub fn set_softmute_attenuation(&mut self, attenuation: SoftmuteAttenuation) -> Result<()> {
        self.ensure_ready()?;
        if self.settings.softmute_attenuation == attenuation {
            return Ok(());
        }
        self.commit(Register::SysConfig3, |regs| {
            regs.set_field(Field::SMUTEA, attenuation.as_reg());
        })?;
        self.settings.softmute_attenuation = attenuation;
        Ok(())
    }

    /// Forced mono state
    #[must_use]
    pub const fn mono(&self) -> bool {
        self.settings.mono
    }

    /// Force mono or allow stereo
    pub fn set_mono(&mut self, mono: bool) -> Result<()> {
        self.ensure_ready()?;
        if self.settings.mono == mono {
            return Ok(());
        }
        self.commit(Register::PowerCfg, |regs| regs.set_flag(Field::MONO, mono))?;
        self.settings.mono = mono;
        Ok(())
    }

    /// Native volume (0-15)
    #[must_use]
    pub const fn volume(&self) -> u8 {
        self.settings.volume
    }

    /// Extended volume range flag
    #[must_use]
    pub const fn volume_extended(&self) -> bool {
        self.settings.volume_extended
    }

    /// Set native volume (clamped to 15) and the extended range flag
    pub fn set_volume(&mut self, volume: u8, extended: bool) -> Result<()> {
        self.ensure_ready()?;
        let volume = volume.min(crate::config::MAX_VOLUME);
        if self.settings.volume == volume && self.settings.volume_extended == extended {
            return Ok(());
        }
        self.commit(Register::SysConfig3, |regs| {
            settings::encode_volume(regs, volume, extended);
        })?;
        self.settings.volume = volume;
        self.settings.volume_extended = extended;
        Ok(())
    }

    /// Volume on the continuous 0-30 scale
    #[must_use]
    pub const fn volume_level(&self) -> u8 {
        self.settings.volume_level()
    }

    /// Set volume on the continuous 0-30 scale (clamped to 30)
    pub fn set_volume_level(&mut self, level: u8) -> Result<()> {
        let (volume, extended) = settings::volume_level_to_native(level);
        self.set_volume(volume, extended)
    }

    /// Received signal strength in dBµV
    pub fn rssi(&mut self) -> Result<u8> {
        self.ensure_powered()?;
        self.read_up_to(Register::StatusRssi)?;
        Ok(field_u8(&self.regs, Field::RSSI))
    }

    /// Check if the chip reports a stereo pilot
    pub fn stereo_indicator(&mut self) -> Result<bool> {
        self.ensure_powered()?;
        self.read_up_to(Register::StatusRssi)?;
        Ok(self.regs.flag(Field::ST))
    }

    fn ensure_powered(&self) -> Result<()> {
        if self.is_powered_up() {
            Ok(())
        } else {
            Err(Error::NotPoweredUp)
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.task.is_idle() {
            Ok(())
        } else {
            Err(Error::TaskPending)
        }
    }

    /// Preconditions of every hardware-mutating setter
    fn ensure_ready(&self) -> Result<()> {
        self.ensure_powered()?;
        self.ensure_idle()
    }

    /// Encode into a copy of the mirror, write through `last`, then commit
    fn commit<F>(&mut self, last: Register, encode: F) -> Result<()>
    where
        F: FnOnce(&mut RegisterFile),
    {
        let mut staged = self.regs;
        encode(&mut staged);
        transport::write_up_to(&mut self.bus, &staged, last)?;
        self.regs = staged;
        Ok(())
    }

    fn read_up_to(&mut self, reg: Register) -> Result<()> {
        transport::read_up_to(&mut self.bus, &mut self.regs, reg)
    }

    fn read_all(&mut self) -> Result<()> {
        transport::read(&mut self.bus, &mut self.regs, registers::REGISTER_COUNT)
    }

    fn write_up_to(&mut self, reg: Register) -> Result<()> {
        transport::write_up_to(&mut self.bus, &self.regs, reg)
    }

    /// Refresh the current frequency from READCHAN
    fn update_frequency(&mut self) {
        let channel = self.regs.field(Field::READCHAN);
        self.frequency = Some(self.frequency_range().channel_to_frequency(channel));
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn field_u8(regs: &RegisterFile, field: Field) -> u8 {
    regs.field(field) as u8
}
