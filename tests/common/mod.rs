//! Shared test fixtures
//!
//! A register-level Si4703 simulator behind `embedded_hal::i2c::I2c`, a
//! manual clock that doubles as the delay provider, and recording reset
//! pins. All fixtures share state through `Rc` so a test can inspect and
//! steer the "hardware" while the driver owns its half.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use si470x_firmware::hal::gpio::BusPins;
use si470x_firmware::hal::timer::Clock;
use si470x_firmware::types::RegionConfig;
use si470x_firmware::{Result, Si470x};

pub const CHIP_ADDR: u8 = 0x10;
pub const DEVICE_ID_SI470X: u16 = 0x1242;
pub const CHIP_ID_SI4703: u16 = 0x1253;
pub const CHIP_ID_SI4702: u16 = 0x1053;

// ============================================================================
// Chip simulator
// ============================================================================

/// Simulated chip state
#[derive(Debug)]
pub struct ChipState {
    /// Control registers 00h..09h as written by the driver
    pub regs: [u16; 10],
    /// DEVICEID returned on read
    pub device_id: u16,
    /// CHIPID returned once enabled
    pub powered_chip_id: u16,
    pub enabled: bool,

    pub rssi: u8,
    pub stereo: bool,
    pub stc: bool,
    pub sfbl: bool,
    pub readchan: u16,
    /// STC stays set after TUNE/SEEK are cleared
    pub stc_stuck: bool,
    /// Operation never completes
    pub hang: bool,

    /// Status reads a tune stays busy
    pub tune_busy_reads: u32,
    /// Status reads a seek stays busy
    pub seek_busy_reads: u32,
    busy_left: u32,
    tuning: bool,
    seeking: bool,
    seek_start: u16,
    /// Channels carrying a station
    pub stations: Vec<u16>,

    /// Pending RDS group, consumed by the next read through RDSD
    pub rds_group: Option<[u16; 4]>,
    /// BLERA..BLERD of the pending group
    pub rds_errors: [u8; 4],
    pub rds_synced: bool,
    rds_blocks: [u16; 4],
    rdsr: bool,

    /// Words per completed read
    pub reads: Vec<usize>,
    /// Words of each completed write
    pub writes: Vec<Vec<u16>>,
    /// Fail this many upcoming reads
    pub fail_reads: usize,
    /// Fail this many upcoming writes
    pub fail_writes: usize,
}

impl ChipState {
    pub fn new() -> Self {
        Self {
            regs: [0; 10],
            device_id: DEVICE_ID_SI470X,
            powered_chip_id: CHIP_ID_SI4703,
            enabled: false,
            rssi: 40,
            stereo: true,
            stc: false,
            sfbl: false,
            readchan: 0,
            stc_stuck: false,
            hang: false,
            tune_busy_reads: 2,
            seek_busy_reads: 3,
            busy_left: 0,
            tuning: false,
            seeking: false,
            seek_start: 0,
            stations: Vec::new(),
            rds_group: None,
            rds_errors: [0; 4],
            rds_synced: true,
            rds_blocks: [0; 4],
            rdsr: false,
            reads: Vec::new(),
            writes: Vec::new(),
            fail_reads: 0,
            fail_writes: 0,
        }
    }

    /// Total completed bus transactions
    pub fn transactions(&self) -> usize {
        self.reads.len() + self.writes.len()
    }

    pub fn chan(&self) -> u16 {
        self.regs[3] & 0x03FF
    }

    pub fn last_write(&self) -> Option<&Vec<u16>> {
        self.writes.last()
    }

    /// Forget recorded traffic
    pub fn clear_log(&mut self) {
        self.reads.clear();
        self.writes.clear();
    }

    fn top_channel(&self) -> u16 {
        let band = (self.regs[5] >> 6) & 0x3;
        let space = (self.regs[5] >> 4) & 0x3;
        let (bottom, top): (u32, u32) = match band {
            0 => (87_500, 108_000),
            1 => (76_000, 108_000),
            _ => (76_000, 90_000),
        };
        let step: u32 = match space {
            0 => 200,
            1 => 100,
            _ => 50,
        };
        u16::try_from((top - bottom) / step).unwrap()
    }

    fn step_operation(&mut self) {
        if !(self.tuning || self.seeking) || self.stc || self.hang {
            return;
        }
        if self.busy_left > 0 {
            self.busy_left -= 1;
            if self.seeking {
                let up = self.regs[2] & (1 << 9) != 0;
                let top = self.top_channel();
                self.readchan = if up {
                    if self.readchan >= top { 0 } else { self.readchan + 1 }
                } else if self.readchan == 0 {
                    top
                } else {
                    self.readchan - 1
                };
            }
            return;
        }
        if self.tuning {
            self.readchan = self.chan();
        } else {
            let up = self.regs[2] & (1 << 9) != 0;
            match self.next_station(up) {
                Some(ch) => {
                    self.readchan = ch;
                    self.sfbl = false;
                }
                None => {
                    self.readchan = self.seek_start;
                    self.sfbl = true;
                }
            }
        }
        self.stc = true;
    }

    fn next_station(&self, up: bool) -> Option<u16> {
        let top = self.top_channel();
        let start = self.seek_start;
        let mut candidates: Vec<u16> = self
            .stations
            .iter()
            .copied()
            .filter(|&c| c <= top && c != start)
            .collect();
        candidates.sort_unstable();
        if up {
            candidates
                .iter()
                .copied()
                .find(|&c| c > start)
                .or_else(|| candidates.first().copied())
        } else {
            candidates
                .iter()
                .rev()
                .copied()
                .find(|&c| c < start)
                .or_else(|| candidates.last().copied())
        }
    }

    fn word(&mut self, index: usize) -> u16 {
        match index {
            0x0 => self.device_id,
            0x1 => {
                if self.enabled {
                    self.powered_chip_id
                } else {
                    self.powered_chip_id & !0x03C0
                }
            }
            0x2..=0x9 => self.regs[index],
            0xA => {
                u16::from(self.rssi)
                    | (u16::from(self.stereo) << 8)
                    | (u16::from(self.rds_errors[0] & 3) << 9)
                    | (u16::from(self.rds_synced) << 11)
                    | (u16::from(self.sfbl) << 13)
                    | (u16::from(self.stc) << 14)
                    | (u16::from(self.rdsr) << 15)
            }
            0xB => {
                self.readchan
                    | (u16::from(self.rds_errors[3] & 3) << 10)
                    | (u16::from(self.rds_errors[2] & 3) << 12)
                    | (u16::from(self.rds_errors[1] & 3) << 14)
            }
            _ => self.rds_blocks[index - 0xC],
        }
    }

    fn on_read(&mut self, buf: &mut [u8]) {
        let words = buf.len() / 2;
        self.step_operation();

        let rds_enabled = self.regs[4] & (1 << 12) != 0;
        self.rdsr = false;
        if words >= 6 && rds_enabled {
            if let Some(group) = self.rds_group.take() {
                self.rds_blocks = group;
                self.rdsr = true;
            }
        }

        for i in 0..words {
            let index = (0xA + i) % 16;
            let value = self.word(index);
            buf[2 * i..2 * i + 2].copy_from_slice(&value.to_be_bytes());
        }
        self.reads.push(words);
    }

    fn on_write(&mut self, bytes: &[u8]) {
        let words: Vec<u16> = bytes
            .chunks(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .collect();
        for (i, &w) in words.iter().enumerate() {
            let index = 2 + i;
            if index <= 9 {
                self.regs[index] = w;
            }
        }

        let powercfg = self.regs[2];
        if powercfg & (1 << 6) != 0 {
            self.enabled = false;
        } else if powercfg & 1 != 0 {
            self.enabled = true;
        }

        let tune = self.regs[3] & 0x8000 != 0;
        let seek = powercfg & (1 << 8) != 0;
        if tune && !self.tuning {
            self.tuning = true;
            self.busy_left = self.tune_busy_reads;
        }
        if seek && !self.seeking {
            self.seeking = true;
            self.seek_start = self.readchan;
            self.busy_left = self.seek_busy_reads;
        }
        if !tune && !seek {
            self.tuning = false;
            self.seeking = false;
            if !self.stc_stuck {
                self.stc = false;
                self.sfbl = false;
            }
        }
        self.writes.push(words);
    }
}

impl Default for ChipState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus handle given to the driver
pub struct FakeBus(pub Rc<RefCell<ChipState>>);

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), Self::Error> {
        if address != CHIP_ADDR {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let mut chip = self.0.borrow_mut();
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    if chip.fail_reads > 0 {
                        chip.fail_reads -= 1;
                        return Err(ErrorKind::Bus);
                    }
                    chip.on_read(buf);
                }
                Operation::Write(bytes) => {
                    if chip.fail_writes > 0 {
                        chip.fail_writes -= 1;
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                    }
                    chip.on_write(bytes);
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Time
// ============================================================================

/// Manual microsecond clock
#[derive(Clone)]
pub struct FakeClock(pub Rc<Cell<u64>>);

impl Clock for FakeClock {
    fn now_us(&self) -> u64 {
        self.0.get()
    }
}

/// Delay that advances the shared clock and records millisecond waits
#[derive(Clone)]
pub struct FakeDelay {
    pub now: Rc<Cell<u64>>,
    pub waits_ms: Rc<RefCell<Vec<u32>>>,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now.set(self.now.get() + u64::from(ns) / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.now.set(self.now.get() + u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.borrow_mut().push(ms);
        self.now.set(self.now.get() + u64::from(ms) * 1000);
    }
}

// ============================================================================
// Pins
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinEvent {
    SdioLow,
    Reset(bool),
    Attach { pull_ups: bool },
}

/// Pins that record every action
pub struct FakePins(pub Rc<RefCell<Vec<PinEvent>>>);

impl BusPins for FakePins {
    fn hold_sdio_low(&mut self) -> Result<()> {
        self.0.borrow_mut().push(PinEvent::SdioLow);
        Ok(())
    }

    fn set_reset(&mut self, high: bool) -> Result<()> {
        self.0.borrow_mut().push(PinEvent::Reset(high));
        Ok(())
    }

    fn attach_bus(&mut self, pull_ups: bool) -> Result<()> {
        self.0.borrow_mut().push(PinEvent::Attach { pull_ups });
        Ok(())
    }
}

// ============================================================================
// Rig
// ============================================================================

pub type Radio = Si470x<FakeBus, FakePins, FakeDelay, FakeClock>;

/// Handles to everything outside the driver
#[derive(Clone)]
pub struct Rig {
    pub chip: Rc<RefCell<ChipState>>,
    pub now: Rc<Cell<u64>>,
    pub waits_ms: Rc<RefCell<Vec<u32>>>,
    pub pins: Rc<RefCell<Vec<PinEvent>>>,
}

impl Rig {
    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get() + ms * 1000);
    }

    pub fn advance_us(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }

    pub fn transactions(&self) -> usize {
        self.chip.borrow().transactions()
    }

    /// Forget recorded bus traffic, waits and pin events
    pub fn clear_logs(&self) {
        self.chip.borrow_mut().clear_log();
        self.waits_ms.borrow_mut().clear();
        self.pins.borrow_mut().clear();
    }
}

/// Powered-down radio wired to a fresh simulator
pub fn rig_with(chip: ChipState) -> (Radio, Rig) {
    let rig = Rig {
        chip: Rc::new(RefCell::new(chip)),
        now: Rc::new(Cell::new(0)),
        waits_ms: Rc::new(RefCell::new(Vec::new())),
        pins: Rc::new(RefCell::new(Vec::new())),
    };
    let radio = Si470x::new(
        FakeBus(rig.chip.clone()),
        FakePins(rig.pins.clone()),
        FakeDelay {
            now: rig.now.clone(),
            waits_ms: rig.waits_ms.clone(),
        },
        FakeClock(rig.now.clone()),
        true,
    );
    (radio, rig)
}

pub fn rig() -> (Radio, Rig) {
    rig_with(ChipState::new())
}

/// Radio powered up with `config`, logs cleared
pub fn powered_rig(config: RegionConfig) -> (Radio, Rig) {
    let (mut radio, rig) = rig();
    radio.power_up(config).expect("power up");
    rig.clear_logs();
    (radio, rig)
}
