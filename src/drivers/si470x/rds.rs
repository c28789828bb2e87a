//! Raw RDS group access
//!
//! The Si4703 decodes RDS blocks in hardware and flags RDSR when a full
//! group is ready, roughly every 87 ms. Groups are surfaced as-is; decoding
//! program service names and the like is up to the caller.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::registers::{Field, Register, RegisterFile};
use super::Si470x;
use crate::error::{Error, Result};
use crate::hal::gpio::BusPins;
use crate::hal::timer::Clock;

/// Block error level reported by the chip
pub mod block_errors {
    /// No errors
    pub const NONE: u8 = 0;
    /// 1-2 errors, corrected
    pub const CORRECTED_LOW: u8 = 1;
    /// 3-5 errors, corrected
    pub const CORRECTED_HIGH: u8 = 2;
    /// 6+ errors, block uncorrectable
    pub const UNCORRECTABLE: u8 = 3;
}

/// One RDS group (blocks A-D)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RdsGroup {
    /// Raw blocks A, B, C, D
    pub blocks: [u16; 4],
    /// Error level per block, see [`block_errors`]
    pub errors: [u8; 4],
    /// Decoder synchronized
    pub synchronized: bool,
}

impl RdsGroup {
    /// Capture the group currently held in the mirror
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_registers(regs: &RegisterFile) -> Self {
        Self {
            blocks: [
                regs.get(Register::RdsA),
                regs.get(Register::RdsB),
                regs.get(Register::RdsC),
                regs.get(Register::RdsD),
            ],
            errors: [
                regs.field(Field::BLERA) as u8,
                regs.field(Field::BLERB) as u8,
                regs.field(Field::BLERC) as u8,
                regs.field(Field::BLERD) as u8,
            ],
            synchronized: regs.flag(Field::RDSS),
        }
    }

    /// Program identification (block A)
    #[must_use]
    pub const fn pi_code(&self) -> u16 {
        self.blocks[0]
    }

    /// Group type 0-15 from block B
    #[must_use]
    pub const fn group_type(&self) -> u8 {
        (self.blocks[1] >> 12) as u8
    }

    /// Check that no block needed correction
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.iter().all(|&e| e == block_errors::NONE)
    }

    /// Check that every block is usable
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.errors.iter().all(|&e| e != block_errors::UNCORRECTABLE)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RdsGroup {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "RDS({=u16:04x} {=u16:04x} {=u16:04x} {=u16:04x} err={})",
            self.blocks[0],
            self.blocks[1],
            self.blocks[2],
            self.blocks[3],
            self.errors
        );
    }
}

impl<I2C, P, D, C> Si470x<I2C, P, D, C>
where
    I2C: I2c,
    P: BusPins,
    D: DelayNs,
    C: Clock,
{
    /// Fetch the next RDS group if one is ready
    ///
    /// Poll about every [`crate::config::RDS_POLL_INTERVAL_MS`] so no group
    /// is missed.
    pub fn read_rds_group(&mut self) -> Result<Option<RdsGroup>> {
        self.ensure_powered()?;
        if !self.is_rds_supported() {
            return Err(Error::RdsUnsupported);
        }
        self.read_up_to(Register::RdsD)?;
        if !self.regs.flag(Field::RDSR) {
            return Ok(None);
        }
        let group = RdsGroup::from_registers(&self.regs);
        trace!("{}", group);
        Ok(Some(group))
    }
}
