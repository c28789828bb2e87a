//! Tune and seek
//!
//! Both operations are started with a single write and then advanced by
//! [`Si470x::task_tick`], which touches the bus only once the poll interval
//! has elapsed. Completion, cancellation and stall all end the same way:
//! clear the start bit, wait for STC to drop and read back the channel.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::registers::{Field, Register};
use super::Si470x;
use crate::config::{STOP_SPIN_BUDGET_US, STOP_SPIN_LIMIT};
use crate::error::{Error, Result};
use crate::hal::gpio::BusPins;
use crate::hal::timer::Clock;
use crate::radio::task::{Progress, TaskKind, TaskOutcome};
use crate::types::{Frequency, SeekDirection};

impl<I2C, P, D, C> Si470x<I2C, P, D, C>
where
    I2C: I2c,
    P: BusPins,
    D: DelayNs,
    C: Clock,
{
    /// Start tuning to the channel nearest `frequency`
    pub fn set_frequency_async(&mut self, frequency: Frequency) -> Result<()> {
        self.ensure_ready()?;
        let channel = self.frequency_range().frequency_to_channel(frequency);
        self.commit(Register::Channel, |regs| {
            regs.set_field(Field::CHAN, channel);
            regs.set_flag(Field::TUNE, true);
        })?;
        self.install_task(TaskKind::Tune);
        debug!("tune to {} (channel {=u16})", frequency, channel);
        Ok(())
    }

    /// Tune to the channel nearest `frequency` and wait for completion
    ///
    /// Returns immediately if the snapped frequency is already tuned.
    pub fn set_frequency_blocking(&mut self, frequency: Frequency) -> Result<TaskOutcome> {
        self.ensure_ready()?;
        if self.frequency == Some(self.frequency_range().snap(frequency)) {
            return Ok(TaskOutcome::Tuned);
        }
        self.set_frequency_async(frequency)?;
        self.run_to_completion(TaskKind::Tune)
    }

    /// Start seeking; wraps at the band edges
    pub fn seek_async(&mut self, direction: SeekDirection) -> Result<()> {
        self.ensure_ready()?;
        self.commit(Register::PowerCfg, |regs| {
            regs.set_flag(Field::SKMODE, false);
            regs.set_flag(Field::SEEKUP, direction == SeekDirection::Up);
            regs.set_flag(Field::SEEK, true);
        })?;
        self.install_task(TaskKind::Seek(direction));
        debug!("seek {}", direction);
        Ok(())
    }

    /// Seek and wait for completion
    pub fn seek_blocking(&mut self, direction: SeekDirection) -> Result<TaskOutcome> {
        self.seek_async(direction)?;
        self.run_to_completion(TaskKind::Seek(direction))
    }

    /// Advance the running task
    ///
    /// Before the resume deadline this returns `Pending` without bus
    /// access. A failed status read leaves the task installed for the next
    /// interval; repeated failures abort it.
    pub fn task_tick(&mut self) -> Result<Progress> {
        let kind = self.task.kind().ok_or(Error::NoTask)?;
        if !self.task.is_due(self.clock.now_us()) {
            return Ok(Progress::Pending);
        }

        let outcome = match self.poll_task(kind) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return Ok(Progress::Pending),
            Err(e) => {
                if self.task.record_bus_error(self.clock.now_us()) {
                    warn!("{} poll failed, retrying: {}", kind, e);
                } else {
                    error!("{} aborted: {}", kind, e);
                    self.task.clear();
                }
                return Err(e);
            }
        };

        self.task.clear();
        self.stop_task(kind)?;
        debug!("{} finished: {} at {}", kind, outcome, self.frequency);
        Ok(Progress::Done(outcome))
    }

    /// Stop the running task where the hardware currently is
    ///
    /// The slot is released even if the stop round-trip fails.
    pub fn task_cancel(&mut self) -> Result<TaskOutcome> {
        let kind = self.task.clear().ok_or(Error::NoTask)?;
        self.stop_task(kind)?;
        debug!("{} canceled at {}", kind, self.frequency);
        Ok(TaskOutcome::Canceled)
    }

    fn install_task(&mut self, kind: TaskKind) {
        let max_polls = kind.max_polls(&self.frequency_range());
        self.task.install(kind, self.clock.now_us(), max_polls);
    }

    /// Read status; `None` while the operation is still running
    fn poll_task(&mut self, kind: TaskKind) -> Result<Option<TaskOutcome>> {
        match kind {
            TaskKind::Tune => {
                self.read_up_to(Register::StatusRssi)?;
                if self.regs.flag(Field::STC) {
                    return Ok(Some(TaskOutcome::Tuned));
                }
            }
            TaskKind::Seek(_) => {
                self.read_up_to(Register::ReadChan)?;
                if self.regs.flag(Field::STC) {
                    return Ok(Some(if self.regs.flag(Field::SFBL) {
                        TaskOutcome::SeekFailed
                    } else {
                        TaskOutcome::SeekFound
                    }));
                }
                self.update_frequency();
            }
        }

        trace!("{} poll {=u16}", kind, self.task.polls());
        if self.task.reschedule(self.clock.now_us()) {
            Ok(None)
        } else {
            warn!("{} stalled", kind);
            Ok(Some(TaskOutcome::TimedOut))
        }
    }

    /// Clear the start bit, wait for STC to drop, read back the channel
    fn stop_task(&mut self, kind: TaskKind) -> Result<()> {
        match kind {
            TaskKind::Tune => {
                self.regs.set_flag(Field::TUNE, false);
                self.write_up_to(Register::Channel)?;
            }
            TaskKind::Seek(_) => {
                self.regs.set_flag(Field::SEEK, false);
                self.write_up_to(Register::PowerCfg)?;
            }
        }
        self.wait_stc_clear()?;
        self.read_up_to(Register::ReadChan)?;
        self.update_frequency();
        Ok(())
    }

    /// STC drops within 1.5 ms of clearing TUNE/SEEK; bounded by count and clock
    fn wait_stc_clear(&mut self) -> Result<()> {
        let start = self.clock.now_us();
        for _ in 0..STOP_SPIN_LIMIT {
            self.read_up_to(Register::StatusRssi)?;
            if !self.regs.flag(Field::STC) {
                return Ok(());
            }
            if self.clock.now_us().saturating_sub(start) > STOP_SPIN_BUDGET_US {
                break;
            }
        }
        error!("STC stuck after stop");
        Err(Error::StopTimeout)
    }

    /// Delay one poll interval and tick until done
    ///
    /// Retried bus errors are absorbed; an error that aborted the task is
    /// returned.
    fn run_to_completion(&mut self, kind: TaskKind) -> Result<TaskOutcome> {
        loop {
            self.delay.delay_ms(kind.poll_interval_ms());
            match self.task_tick() {
                Ok(Progress::Done(outcome)) => return Ok(outcome),
                Ok(Progress::Pending) => {}
                Err(e) if self.task.is_idle() => return Err(e),
                Err(_) => {}
            }
        }
    }
}
