//! Single-slot cooperative task state
//!
//! Holds at most one long-running hardware operation (tune or seek)
//! together with its resume deadline and poll bookkeeping. The bus work for
//! each step lives in the driver; this module only decides *when* a step
//! may run and when an operation has stalled.

use crate::config::{
    MAX_CONSECUTIVE_BUS_ERRORS, MAX_TUNE_POLLS, SEEK_CHANNEL_TIME_MS, SEEK_POLL_INTERVAL_MS,
    SEEK_POLL_MARGIN, TUNE_POLL_INTERVAL_MS,
};
use crate::hal::timer::Deadline;
use crate::radio::channel::FrequencyRange;
use crate::types::SeekDirection;

/// Kind of operation held by the slot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Tuning to a channel
    Tune,
    /// Seeking in a direction
    Seek(SeekDirection),
}

impl TaskKind {
    /// Interval between status polls
    #[must_use]
    pub const fn poll_interval_ms(self) -> u32 {
        match self {
            Self::Tune => TUNE_POLL_INTERVAL_MS,
            Self::Seek(_) => SEEK_POLL_INTERVAL_MS,
        }
    }

    /// Polls allowed in `range` before the operation counts as stalled
    ///
    /// A seek may visit every channel once before it wraps back to its
    /// start, so its cap grows with the channel count.
    #[must_use]
    pub fn max_polls(self, range: &FrequencyRange) -> u16 {
        match self {
            Self::Tune => MAX_TUNE_POLLS,
            Self::Seek(_) => seek_poll_cap(range.channel_count()),
        }
    }
}

/// Seek poll cap for a band of `channels` channels
#[must_use]
pub fn seek_poll_cap(channels: u16) -> u16 {
    let wrap_ms = u32::from(channels) * SEEK_CHANNEL_TIME_MS;
    let polls = wrap_ms.div_ceil(SEEK_POLL_INTERVAL_MS);
    u16::try_from(polls)
        .unwrap_or(u16::MAX)
        .saturating_add(SEEK_POLL_MARGIN)
}

#[cfg(feature = "embedded")]
impl defmt::Format for TaskKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Tune => defmt::write!(f, "tune"),
            Self::Seek(dir) => defmt::write!(f, "seek {}", dir),
        }
    }
}

/// How a finished task ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Tune reached its channel
    Tuned,
    /// Seek stopped on a qualifying station
    SeekFound,
    /// Seek hit the band limit without a station
    SeekFailed,
    /// Stopped by the caller
    Canceled,
    /// Completion flag never set within the poll cap
    TimedOut,
}

impl TaskOutcome {
    /// Whether the operation achieved its goal
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Tuned | Self::SeekFound)
    }

    /// Numeric result: 0 on success, -1 otherwise
    #[must_use]
    pub const fn code(self) -> i32 {
        if self.is_success() {
            0
        } else {
            -1
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TaskOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Tuned => defmt::write!(f, "tuned"),
            Self::SeekFound => defmt::write!(f, "found"),
            Self::SeekFailed => defmt::write!(f, "band limit"),
            Self::Canceled => defmt::write!(f, "canceled"),
            Self::TimedOut => defmt::write!(f, "timed out"),
        }
    }
}

/// Result of one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Operation still running
    Pending,
    /// Operation finished, slot released
    Done(TaskOutcome),
}

/// An installed operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Running {
    kind: TaskKind,
    deadline: Deadline,
    polls: u16,
    max_polls: u16,
    bus_errors: u8,
}

/// The task slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TaskSlot {
    running: Option<Running>,
}

impl TaskSlot {
    /// Empty slot
    #[must_use]
    pub const fn new() -> Self {
        Self { running: None }
    }

    /// Check if no operation is installed
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    /// Kind of the installed operation
    #[must_use]
    pub fn kind(&self) -> Option<TaskKind> {
        self.running.map(|r| r.kind)
    }

    /// Install an operation; first poll one interval after `now_us`
    ///
    /// The operation may be polled `max_polls` times before it counts as
    /// stalled. Returns `false` and leaves the slot unchanged if it is
    /// occupied.
    pub fn install(&mut self, kind: TaskKind, now_us: u64, max_polls: u16) -> bool {
        if self.running.is_some() {
            return false;
        }
        self.running = Some(Running {
            kind,
            deadline: Deadline::after_ms(now_us, kind.poll_interval_ms()),
            polls: 0,
            max_polls,
            bus_errors: 0,
        });
        true
    }

    /// Check if the installed operation may be stepped at `now_us`
    #[must_use]
    pub fn is_due(&self, now_us: u64) -> bool {
        self.running.is_some_and(|r| r.deadline.expired(now_us))
    }

    /// Schedule the next poll after an incomplete step
    ///
    /// Returns `false` once the operation has used up its poll budget.
    pub fn reschedule(&mut self, now_us: u64) -> bool {
        match self.running.as_mut() {
            Some(running) => {
                running.polls = running.polls.saturating_add(1);
                running.bus_errors = 0;
                running.deadline = Deadline::after_ms(now_us, running.kind.poll_interval_ms());
                running.polls < running.max_polls
            }
            None => false,
        }
    }

    /// Record a failed bus access during a step and retry at the next interval
    ///
    /// Returns `false` once the consecutive failure limit is reached.
    pub fn record_bus_error(&mut self, now_us: u64) -> bool {
        match self.running.as_mut() {
            Some(running) => {
                running.bus_errors = running.bus_errors.saturating_add(1);
                running.deadline = Deadline::after_ms(now_us, running.kind.poll_interval_ms());
                running.bus_errors < MAX_CONSECUTIVE_BUS_ERRORS
            }
            None => false,
        }
    }

    /// Polls performed so far
    #[must_use]
    pub fn polls(&self) -> u16 {
        self.running.map_or(0, |r| r.polls)
    }

    /// Release the slot
    pub fn clear(&mut self) -> Option<TaskKind> {
        self.running.take().map(|r| r.kind)
    }
}
