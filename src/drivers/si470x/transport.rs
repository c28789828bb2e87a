//! Register transport
//!
//! The Si470x has no register pointer: a bus read always starts at 0Ah and
//! wraps from 0Fh to 00h, a bus write always starts at 02h. Words are sent
//! most significant byte first.

use embedded_hal::i2c::I2c;
use heapless::Vec;

use super::registers::{Register, RegisterFile, REGISTER_COUNT, WRITABLE_COUNT};
use crate::error::{Error, Result};
use crate::hal::i2c::I2cBus;

/// Register addressed by the `index`-th word of a read
#[must_use]
pub const fn read_order(index: usize) -> usize {
    (Register::READ_START.index() + index) % REGISTER_COUNT
}

/// Read `count` words into the mirror starting at 0Ah
///
/// The mirror is only updated once the whole transfer has succeeded.
pub fn read<I: I2c>(bus: &mut I2cBus<I>, regs: &mut RegisterFile, count: usize) -> Result<()> {
    if count == 0 || count > REGISTER_COUNT {
        return Err(Error::InvalidRegister);
    }
    let mut buf = [0u8; REGISTER_COUNT * 2];
    let bytes = &mut buf[..count * 2];
    bus.read(bytes)?;

    for (i, word) in bytes.chunks_exact(2).enumerate() {
        let value = u16::from_be_bytes([word[0], word[1]]);
        regs.set(Register::ALL[read_order(i)], value);
    }
    trace!("read {=usize} words", count);
    Ok(())
}

/// Read every register from 0Ah through `reg`
pub fn read_up_to<I: I2c>(bus: &mut I2cBus<I>, regs: &mut RegisterFile, reg: Register) -> Result<()> {
    read(bus, regs, reg.read_count_up_to())
}

/// Write `count` words from the mirror starting at 02h
pub fn write<I: I2c>(bus: &mut I2cBus<I>, regs: &RegisterFile, count: usize) -> Result<()> {
    if count == 0 || count > WRITABLE_COUNT {
        return Err(Error::InvalidRegister);
    }
    let first = Register::WRITE_START.index();
    let mut buf: Vec<u8, { WRITABLE_COUNT * 2 }> = Vec::new();
    for &reg in &Register::ALL[first..first + count] {
        buf.extend_from_slice(&regs.get(reg).to_be_bytes())
            .map_err(|()| Error::InvalidRegister)?;
    }
    bus.write(&buf)?;
    trace!("wrote {=usize} words", count);
    Ok(())
}

/// Write every register from 02h through `reg`
pub fn write_up_to<I: I2c>(bus: &mut I2cBus<I>, regs: &RegisterFile, reg: Register) -> Result<()> {
    let count = reg.write_count_up_to().ok_or(Error::InvalidRegister)?;
    write(bus, regs, count)
}
