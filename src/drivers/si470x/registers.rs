//! Si470x register map
//!
//! Typed description of the 16 chip registers and the bit fields inside
//! them. Every access to a setting goes through a [`Field`], so the wire
//! layout lives in this file only.
//!
//! Reference: Si4702/03-C19 datasheet, section 6 (register summary).

/// Number of 16-bit registers on the chip
pub const REGISTER_COUNT: usize = 16;

/// Number of writable registers (02h..0Fh)
pub const WRITABLE_COUNT: usize = 14;

/// Register addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Register {
    /// 00h, manufacturer and part number
    DeviceId = 0x0,
    /// 01h, revision, device and firmware
    ChipId = 0x1,
    /// 02h, power and seek control
    PowerCfg = 0x2,
    /// 03h, tune control and channel
    Channel = 0x3,
    /// 04h, interrupts, RDS, de-emphasis
    SysConfig1 = 0x4,
    /// 05h, seek threshold, band, spacing, volume
    SysConfig2 = 0x5,
    /// 06h, softmute, extended volume, seek SNR/count
    SysConfig3 = 0x6,
    /// 07h, oscillator enable
    Test1 = 0x7,
    /// 08h, reserved
    Test2 = 0x8,
    /// 09h, reserved
    BootConfig = 0x9,
    /// 0Ah, status and RSSI
    StatusRssi = 0xA,
    /// 0Bh, current channel and block errors
    ReadChan = 0xB,
    /// 0Ch, RDS block A
    RdsA = 0xC,
    /// 0Dh, RDS block B
    RdsB = 0xD,
    /// 0Eh, RDS block C
    RdsC = 0xE,
    /// 0Fh, RDS block D
    RdsD = 0xF,
}

impl Register {
    /// All registers in address order
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::DeviceId,
        Self::ChipId,
        Self::PowerCfg,
        Self::Channel,
        Self::SysConfig1,
        Self::SysConfig2,
        Self::SysConfig3,
        Self::Test1,
        Self::Test2,
        Self::BootConfig,
        Self::StatusRssi,
        Self::ReadChan,
        Self::RdsA,
        Self::RdsB,
        Self::RdsC,
        Self::RdsD,
    ];

    /// First register returned by a bus read
    pub const READ_START: Self = Self::StatusRssi;

    /// First register consumed by a bus write
    pub const WRITE_START: Self = Self::PowerCfg;

    /// Register index (0..16)
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 00h and 01h are read-only identity registers
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.index() >= Self::WRITE_START.index()
    }

    /// Number of words a read must transfer to reach this register
    ///
    /// Reads start at 0Ah and wrap to 00h after 0Fh.
    #[must_use]
    pub const fn read_count_up_to(self) -> usize {
        let index = self.index();
        if index >= Self::READ_START.index() {
            index - Self::READ_START.index() + 1
        } else {
            index + (REGISTER_COUNT - Self::READ_START.index()) + 1
        }
    }

    /// Number of words a write must transfer to reach this register
    ///
    /// Writes start at 02h; `None` for the read-only registers.
    #[must_use]
    pub const fn write_count_up_to(self) -> Option<usize> {
        if self.is_writable() {
            Some(self.index() - Self::WRITE_START.index() + 1)
        } else {
            None
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Register {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u8:x}h", *self as u8);
    }
}

/// Position of a bit field inside a register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Register holding the field
    pub reg: Register,
    /// Least significant bit
    pub lsb: u8,
    /// Width in bits
    pub width: u8,
}

impl Field {
    /// Describe a multi-bit field
    #[must_use]
    pub const fn new(reg: Register, lsb: u8, width: u8) -> Self {
        Self { reg, lsb, width }
    }

    /// Describe a single-bit flag
    #[must_use]
    pub const fn bit(reg: Register, lsb: u8) -> Self {
        Self::new(reg, lsb, 1)
    }

    /// Unshifted value mask
    #[must_use]
    pub const fn value_mask(self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    /// In-register mask
    #[must_use]
    pub const fn mask(self) -> u16 {
        self.value_mask() << self.lsb
    }

    // 00h DEVICEID
    /// Manufacturer ID
    pub const MFGID: Self = Self::new(Register::DeviceId, 0, 12);
    /// Part number
    pub const PN: Self = Self::new(Register::DeviceId, 12, 4);

    // 01h CHIPID
    /// Firmware version
    pub const FIRMWARE: Self = Self::new(Register::ChipId, 0, 6);
    /// Device variant
    pub const DEV: Self = Self::new(Register::ChipId, 6, 4);
    /// Chip revision
    pub const REV: Self = Self::new(Register::ChipId, 10, 6);

    // 02h POWERCFG
    /// Power-up enable
    pub const ENABLE: Self = Self::bit(Register::PowerCfg, 0);
    /// Power-down request
    pub const DISABLE: Self = Self::bit(Register::PowerCfg, 6);
    /// Start seek
    pub const SEEK: Self = Self::bit(Register::PowerCfg, 8);
    /// Seek direction, 1 = up
    pub const SEEKUP: Self = Self::bit(Register::PowerCfg, 9);
    /// Seek mode, 1 = stop at band limit, 0 = wrap
    pub const SKMODE: Self = Self::bit(Register::PowerCfg, 10);
    /// Force mono
    pub const MONO: Self = Self::bit(Register::PowerCfg, 13);
    /// Mute disable (inverted mute)
    pub const DMUTE: Self = Self::bit(Register::PowerCfg, 14);
    /// Softmute disable (inverted softmute)
    pub const DSMUTE: Self = Self::bit(Register::PowerCfg, 15);

    // 03h CHANNEL
    /// Channel select
    pub const CHAN: Self = Self::new(Register::Channel, 0, 10);
    /// Start tune
    pub const TUNE: Self = Self::bit(Register::Channel, 15);

    // 04h SYSCONFIG1
    /// De-emphasis, 1 = 50 µs
    pub const DE: Self = Self::bit(Register::SysConfig1, 11);
    /// RDS enable
    pub const RDS: Self = Self::bit(Register::SysConfig1, 12);

    // 05h SYSCONFIG2
    /// Volume
    pub const VOLUME: Self = Self::new(Register::SysConfig2, 0, 4);
    /// Channel spacing
    pub const SPACE: Self = Self::new(Register::SysConfig2, 4, 2);
    /// Band select
    pub const BAND: Self = Self::new(Register::SysConfig2, 6, 2);
    /// RSSI seek threshold
    pub const SEEKTH: Self = Self::new(Register::SysConfig2, 8, 8);

    // 06h SYSCONFIG3
    /// Seek FM impulse detection threshold
    pub const SKCNT: Self = Self::new(Register::SysConfig3, 0, 4);
    /// Seek SNR threshold
    pub const SKSNR: Self = Self::new(Register::SysConfig3, 4, 4);
    /// Extended volume range
    pub const VOLEXT: Self = Self::bit(Register::SysConfig3, 8);
    /// Softmute attenuation
    pub const SMUTEA: Self = Self::new(Register::SysConfig3, 12, 2);
    /// Softmute attack/recover rate
    pub const SMUTER: Self = Self::new(Register::SysConfig3, 14, 2);

    // 07h TEST1
    /// Crystal oscillator enable
    pub const XOSCEN: Self = Self::bit(Register::Test1, 15);

    // 0Ah STATUSRSSI
    /// Received signal strength
    pub const RSSI: Self = Self::new(Register::StatusRssi, 0, 8);
    /// Stereo indicator
    pub const ST: Self = Self::bit(Register::StatusRssi, 8);
    /// RDS block A errors
    pub const BLERA: Self = Self::new(Register::StatusRssi, 9, 2);
    /// RDS synchronized
    pub const RDSS: Self = Self::bit(Register::StatusRssi, 11);
    /// Seek fail / band limit
    pub const SFBL: Self = Self::bit(Register::StatusRssi, 13);
    /// Seek/tune complete
    pub const STC: Self = Self::bit(Register::StatusRssi, 14);
    /// RDS group ready
    pub const RDSR: Self = Self::bit(Register::StatusRssi, 15);

    // 0Bh READCHAN
    /// Current channel
    pub const READCHAN: Self = Self::new(Register::ReadChan, 0, 10);
    /// RDS block D errors
    pub const BLERD: Self = Self::new(Register::ReadChan, 10, 2);
    /// RDS block C errors
    pub const BLERC: Self = Self::new(Register::ReadChan, 12, 2);
    /// RDS block B errors
    pub const BLERB: Self = Self::new(Register::ReadChan, 14, 2);
}

/// Shadow copy of all chip registers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RegisterFile {
    words: [u16; REGISTER_COUNT],
}

impl RegisterFile {
    /// All-zero register file
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [0; REGISTER_COUNT],
        }
    }

    /// Build from raw words in address order
    #[must_use]
    pub const fn from_words(words: [u16; REGISTER_COUNT]) -> Self {
        Self { words }
    }

    /// Raw words in address order
    #[must_use]
    pub const fn words(&self) -> &[u16; REGISTER_COUNT] {
        &self.words
    }

    /// Raw register value
    #[must_use]
    pub const fn get(&self, reg: Register) -> u16 {
        self.words[reg.index()]
    }

    /// Overwrite a raw register value
    pub fn set(&mut self, reg: Register, value: u16) {
        self.words[reg.index()] = value;
    }

    /// Read a field
    #[must_use]
    pub const fn field(&self, field: Field) -> u16 {
        (self.words[field.reg.index()] >> field.lsb) & field.value_mask()
    }

    /// Write a field; excess value bits are discarded
    pub fn set_field(&mut self, field: Field, value: u16) {
        let word = &mut self.words[field.reg.index()];
        *word = (*word & !field.mask()) | ((value & field.value_mask()) << field.lsb);
    }

    /// Read a single-bit flag
    #[must_use]
    pub const fn flag(&self, field: Field) -> bool {
        self.field(field) != 0
    }

    /// Write a single-bit flag
    pub fn set_flag(&mut self, field: Field, value: bool) {
        self.set_field(field, u16::from(value));
    }
}
