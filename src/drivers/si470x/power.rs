//! Power sequencing
//!
//! Cold bring-up follows AN230 "Powerup Configuration Sequence": bus mode
//! selection with SDIO low across the RESET rising edge, oscillator start,
//! ENABLE, then the full settings write. A soft power-down keeps the chip
//! registers, so powering up again with the same region only needs ENABLE.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::registers::{Field, Register};
use super::Si470x;
use crate::config::{
    MANUFACTURER_ID, OSCILLATOR_SETTLE_MS, PART_NUMBER, POWERUP_SETTLE_MS, RESET_HOLD_MS,
};
use crate::error::{Error, Result};
use crate::hal::gpio::BusPins;
use crate::hal::timer::Clock;
use crate::power::{select_path, PowerPath, PowerState};
use crate::radio::settings;
use crate::types::{DeviceVariant, RegionConfig};

impl<I2C, P, D, C> Si470x<I2C, P, D, C>
where
    I2C: I2c,
    P: BusPins,
    D: DelayNs,
    C: Clock,
{
    /// Power up with `config`
    ///
    /// Resumes warm when the chip was soft powered down with the same
    /// region, otherwise runs the full cold bring-up. After a cold boot the
    /// previously tuned frequency, if any, is restored.
    pub fn power_up(&mut self, config: RegionConfig) -> Result<()> {
        if self.is_powered_up() {
            return Err(Error::AlreadyPoweredUp);
        }
        let path = select_path(&self.regs, &self.config, &config);
        info!("power up ({}) {}", path, config);

        self.state = PowerState::PoweringUp;
        let result = match path {
            PowerPath::WarmResume => self.warm_resume(),
            PowerPath::ColdBoot => {
                self.config = config;
                self.cold_boot()
            }
        };
        self.state = PowerState::settled(self.is_powered_up());

        if let Err(e) = result {
            error!("power up failed: {}", e);
        }
        result
    }

    /// Soft power down, keeping the chip registers
    ///
    /// Any tune or seek in progress is canceled first. The chip is disabled
    /// even if that cancel fails; the cancel error is returned afterwards.
    pub fn power_down(&mut self) -> Result<()> {
        self.ensure_powered()?;
        info!("power down");

        self.state = PowerState::PoweringDown;
        let result = self.power_down_sequence();
        self.state = PowerState::settled(self.is_powered_up());
        result
    }

    fn warm_resume(&mut self) -> Result<()> {
        let mute = self.settings.mute;
        self.commit(Register::PowerCfg, |regs| {
            regs.set_flag(Field::ENABLE, true);
            regs.set_flag(Field::DISABLE, false);
            regs.set_flag(Field::DMUTE, !mute);
        })?;
        self.delay.delay_ms(POWERUP_SETTLE_MS);

        if self.is_rds_supported() {
            self.commit(Register::SysConfig1, |regs| regs.set_flag(Field::RDS, true))?;
        }
        debug!("warm resume done");
        Ok(())
    }

    fn cold_boot(&mut self) -> Result<()> {
        self.select_bus_mode()?;

        self.read_all()?;
        let id = self.device_id();
        if id.manufacturer != MANUFACTURER_ID || id.part != PART_NUMBER {
            return Err(Error::UnknownDevice {
                manufacturer: id.manufacturer,
                part: id.part,
            });
        }

        // Si4703-C19 errata: RDSD must be zero when the oscillator starts
        self.regs.set_flag(Field::XOSCEN, true);
        self.regs.set(Register::RdsD, 0);
        self.write_up_to(Register::RdsD)?;
        self.delay.delay_ms(OSCILLATOR_SETTLE_MS);

        self.regs.set(Register::PowerCfg, Field::ENABLE.mask());
        self.write_up_to(Register::PowerCfg)?;
        self.delay.delay_ms(POWERUP_SETTLE_MS);

        self.read_all()?;
        let chip = self.chip_id();
        let variant = chip.variant().ok_or(Error::UnsupportedDevice(chip.device))?;
        info!("found {} fw {=u8} rev {=u8}", variant, chip.firmware, chip.revision);

        let config = self.config;
        let tuner = self.settings;
        let rds = variant.supports_rds();
        self.commit(Register::SysConfig3, |regs| {
            settings::apply_all(regs, &tuner, &config, rds);
        })?;

        if let Some(frequency) = self.frequency.take() {
            if let Err(e) = self.set_frequency_blocking(frequency) {
                // Keep the target so a later cold boot retunes again
                self.frequency = Some(frequency);
                return Err(e);
            }
        }
        debug!("cold boot done");
        Ok(())
    }

    /// Reset pulse with SDIO low selects the 2-wire bus mode
    fn select_bus_mode(&mut self) -> Result<()> {
        self.pins.hold_sdio_low()?;
        self.pins.set_reset(false)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.pins.set_reset(true)?;
        self.delay.delay_ms(RESET_HOLD_MS);
        self.pins.attach_bus(self.pull_ups)
    }

    fn power_down_sequence(&mut self) -> Result<()> {
        let canceled = if self.has_task() {
            self.task_cancel().map(|_| ())
        } else {
            Ok(())
        };
        if let Err(e) = canceled {
            warn!("cancel before power down failed: {}", e);
        }

        // AN230 "Hardware Powerdown": disable RDS before DISABLE on Si4703
        if self.variant() == Some(DeviceVariant::Si4703) {
            self.commit(Register::SysConfig1, |regs| regs.set_flag(Field::RDS, false))?;
        }
        self.commit(Register::PowerCfg, |regs| {
            regs.set_flag(Field::DMUTE, false);
            regs.set_flag(Field::DISABLE, true);
        })?;

        // The chip clears ENABLE itself; mirror it without a read
        self.regs.set_flag(Field::ENABLE, false);
        canceled
    }
}
