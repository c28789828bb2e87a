//! Driver error type

use core::fmt;
use embedded_hal::i2c::ErrorKind;

/// Tuner driver result
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by the tuner driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// I2C transfer failed or returned short
    I2c(ErrorKind),
    /// Reset or bus pin could not be driven
    Pin,
    /// Register count or index outside the transfer window
    InvalidRegister,
    /// Operation requires the chip to be powered up
    NotPoweredUp,
    /// Power up requested while already powered up
    AlreadyPoweredUp,
    /// A tune or seek task is still in progress
    TaskPending,
    /// Tick or cancel issued with no task installed
    NoTask,
    /// Identity registers do not belong to a Si470x
    UnknownDevice {
        /// Manufacturer ID read from 00h
        manufacturer: u16,
        /// Part number read from 00h
        part: u8,
    },
    /// Device variant is neither Si4702 nor Si4703
    UnsupportedDevice(u8),
    /// RDS requested on a chip without RDS
    RdsUnsupported,
    /// Seek/tune complete flag did not clear after stopping
    StopTimeout,
}

impl Error {
    /// Bring-up failures that indicate wiring or a wrong part
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownDevice { .. } | Self::UnsupportedDevice(_) | Self::Pin
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(kind) => write!(f, "I2C error: {kind}"),
            Self::Pin => write!(f, "pin error"),
            Self::InvalidRegister => write!(f, "register outside transfer window"),
            Self::NotPoweredUp => write!(f, "tuner is powered down"),
            Self::AlreadyPoweredUp => write!(f, "tuner is already powered up"),
            Self::TaskPending => write!(f, "tune or seek in progress"),
            Self::NoTask => write!(f, "no tune or seek in progress"),
            Self::UnknownDevice { manufacturer, part } => write!(
                f,
                "unknown device (manufacturer 0x{manufacturer:03X}, part {part}), check wiring"
            ),
            Self::UnsupportedDevice(dev) => write!(f, "unsupported device variant 0b{dev:04b}"),
            Self::RdsUnsupported => write!(f, "RDS not supported by this chip"),
            Self::StopTimeout => write!(f, "seek/tune complete flag stuck"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::I2c(_) => defmt::write!(f, "I2C"),
            Self::Pin => defmt::write!(f, "Pin"),
            Self::InvalidRegister => defmt::write!(f, "InvalidRegister"),
            Self::NotPoweredUp => defmt::write!(f, "NotPoweredUp"),
            Self::AlreadyPoweredUp => defmt::write!(f, "AlreadyPoweredUp"),
            Self::TaskPending => defmt::write!(f, "TaskPending"),
            Self::NoTask => defmt::write!(f, "NoTask"),
            Self::UnknownDevice { manufacturer, part } => {
                defmt::write!(f, "UnknownDevice({=u16:x}, {=u8})", manufacturer, part);
            }
            Self::UnsupportedDevice(dev) => defmt::write!(f, "UnsupportedDevice({=u8:b})", dev),
            Self::RdsUnsupported => defmt::write!(f, "RdsUnsupported"),
            Self::StopTimeout => defmt::write!(f, "StopTimeout"),
        }
    }
}
