//! Timer Abstractions
//!
//! Monotonic time source and deadlines for the cooperative task engine.
//! Blocking waits go through `embedded_hal::delay::DelayNs` instead.

/// Monotonic microsecond clock
pub trait Clock {
    /// Microseconds since an arbitrary, fixed epoch
    fn now_us(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Point in time after which a task may be polled again
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at_us: u64,
}

impl Deadline {
    /// Deadline `ms` milliseconds after `now_us`
    #[must_use]
    pub const fn after_ms(now_us: u64, ms: u32) -> Self {
        Self {
            at_us: now_us.saturating_add(ms as u64 * 1000),
        }
    }

    /// Check if the deadline has been reached
    #[must_use]
    pub const fn expired(&self, now_us: u64) -> bool {
        now_us >= self.at_us
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Deadline {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Deadline({=u64}us)", self.at_us);
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embedded")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embedded")]
impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

/// Blocking delay backed by the embassy time driver
#[cfg(feature = "embedded")]
pub use embassy_time::Delay as EmbassyDelay;

/// Clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct StdClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start a clock at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_us(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

/// Blocking delay backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
