//! Periodic operation scheduling for time-based callbacks.
//!
//! The render loop drives an [`OperationSchedulerImpl`] once per frame with
//! the current game time and the time the last frame took. Each update first
//! applies any commands that arrived through the lock-free queue, then runs
//! every scheduled operation, then fires the intervals that are due.
//!
//! Operations may be scheduled from any thread through an
//! [`OperationSchedulerQueue`] handle while the loop thread is iterating the
//! live lists. Queued commands become visible at the start of the next update.
//!
//! # Example
//!
//! ```
//! use hudkit_core::{Interval, OperationScheduler, OperationSchedulerImpl, TimingUnit};
//! use std::time::Duration;
//!
//! let scheduler = OperationSchedulerImpl::new();
//! scheduler
//!     .schedule_interval(Interval::new(Duration::from_millis(500), |event| {
//!         println!("blink #{}", event.fire_count);
//!     }))
//!     .unwrap();
//!
//! scheduler.update(0, 16, TimingUnit::Milliseconds);
//! scheduler.update(500, 16, TimingUnit::Milliseconds);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::error::SchedulerError;

/// Identifier of a scheduled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

/// Identifier of a scheduled interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntervalId(u64);

/// The unit in which game and frame times are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingUnit {
    /// Times are nanoseconds.
    Nanoseconds,
    /// Times are microseconds.
    Microseconds,
    /// Times are milliseconds.
    #[default]
    Milliseconds,
}

impl TimingUnit {
    /// Convert a tick count in this unit to a `Duration`.
    pub fn to_duration(self, ticks: u64) -> Duration {
        match self {
            Self::Nanoseconds => Duration::from_nanos(ticks),
            Self::Microseconds => Duration::from_micros(ticks),
            Self::Milliseconds => Duration::from_millis(ticks),
        }
    }

    /// Convert a `Duration` to a tick count in this unit, truncating.
    pub fn from_duration(self, duration: Duration) -> u64 {
        let ticks = match self {
            Self::Nanoseconds => duration.as_nanos(),
            Self::Microseconds => duration.as_micros(),
            Self::Milliseconds => duration.as_millis(),
        };
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}

/// A time-based operation driven by the scheduler every frame.
pub trait ScheduledOperation: Send {
    /// Advance the operation.
    fn update(&mut self, game_time: u64, frame_time: u64, unit: TimingUnit);

    /// A dead operation is dropped before its next update.
    fn is_alive(&self) -> bool {
        true
    }

    /// A non-persistent operation runs exactly once and is then dropped.
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Payload handed to an interval callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalEvent {
    /// Game time of the update that fired the interval.
    pub game_time: Duration,
    /// How many times this interval has fired, including this one.
    pub fire_count: u64,
}

type IntervalCallback = Box<dyn FnMut(IntervalEvent) + Send>;

/// A callback fired every `period` of game time.
pub struct Interval {
    period: Duration,
    next_fire: Option<Duration>,
    fire_count: u64,
    alive: bool,
    callback: IntervalCallback,
}

impl Interval {
    /// Create an interval that fires every `period`.
    ///
    /// The first fire happens one period after the first update that sees it.
    pub fn new<F>(period: Duration, callback: F) -> Self
    where
        F: FnMut(IntervalEvent) + Send + 'static,
    {
        Self {
            period,
            next_fire: None,
            fire_count: 0,
            alive: true,
            callback: Box::new(callback),
        }
    }

    /// The firing period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop the interval; it is dropped on the next update.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Check whether the interval is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Fire the callback if due. A lagging interval fires once and skips ahead
    /// rather than bursting through every missed period.
    fn check(&mut self, game_time: Duration) {
        let Some(next_fire) = self.next_fire else {
            self.next_fire = Some(game_time + self.period);
            return;
        };

        if game_time < next_fire {
            return;
        }

        self.fire_count += 1;
        (self.callback)(IntervalEvent {
            game_time,
            fire_count: self.fire_count,
        });

        let following = next_fire + self.period;
        self.next_fire = Some(if following <= game_time {
            game_time + self.period
        } else {
            following
        });
    }
}

impl std::fmt::Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interval")
            .field("period", &self.period)
            .field("next_fire", &self.next_fire)
            .field("fire_count", &self.fire_count)
            .field("alive", &self.alive)
            .finish()
    }
}

/// Common scheduling surface of the scheduler and its queue handles.
pub trait OperationScheduler {
    /// Schedule an operation; it starts running on the next update.
    fn schedule_operation(
        &self,
        operation: Box<dyn ScheduledOperation>,
    ) -> Result<OperationId, SchedulerError>;

    /// Unschedule an operation. Unknown ids are ignored.
    fn unschedule_operation(&self, id: OperationId) -> Result<(), SchedulerError>;

    /// Schedule an interval; its period starts on the next update.
    fn schedule_interval(&self, interval: Interval) -> Result<IntervalId, SchedulerError>;

    /// Unschedule an interval. Unknown ids are ignored.
    fn unschedule_interval(&self, id: IntervalId) -> Result<(), SchedulerError>;
}

enum SchedulerCommand {
    Schedule(OperationId, Box<dyn ScheduledOperation>),
    Unschedule(OperationId),
    ScheduleInterval(IntervalId, Interval),
    UnscheduleInterval(IntervalId),
}

/// A cloneable, thread-safe handle that feeds the scheduler's command queue.
#[derive(Clone)]
pub struct OperationSchedulerQueue {
    sender: Sender<SchedulerCommand>,
    next_id: Arc<AtomicU64>,
}

impl OperationSchedulerQueue {
    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn send(&self, command: SchedulerCommand) -> Result<(), SchedulerError> {
        self.sender
            .send(command)
            .map_err(|_| SchedulerError::SchedulerDropped)
    }
}

impl OperationScheduler for OperationSchedulerQueue {
    fn schedule_operation(
        &self,
        operation: Box<dyn ScheduledOperation>,
    ) -> Result<OperationId, SchedulerError> {
        let id = OperationId(self.allocate_id());
        self.send(SchedulerCommand::Schedule(id, operation))?;
        Ok(id)
    }

    fn unschedule_operation(&self, id: OperationId) -> Result<(), SchedulerError> {
        self.send(SchedulerCommand::Unschedule(id))
    }

    fn schedule_interval(&self, interval: Interval) -> Result<IntervalId, SchedulerError> {
        let id = IntervalId(self.allocate_id());
        self.send(SchedulerCommand::ScheduleInterval(id, interval))?;
        Ok(id)
    }

    fn unschedule_interval(&self, id: IntervalId) -> Result<(), SchedulerError> {
        self.send(SchedulerCommand::UnscheduleInterval(id))
    }
}

impl std::fmt::Debug for OperationSchedulerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationSchedulerQueue")
            .field("pending", &self.sender.len())
            .finish()
    }
}

/// The frame-driven operation scheduler.
pub struct OperationSchedulerImpl {
    operations: Mutex<Vec<(OperationId, Box<dyn ScheduledOperation>)>>,
    intervals: Mutex<Vec<(IntervalId, Interval)>>,
    queue: OperationSchedulerQueue,
    receiver: Receiver<SchedulerCommand>,
}

impl Default for OperationSchedulerImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationSchedulerImpl {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            operations: Mutex::new(Vec::new()),
            intervals: Mutex::new(Vec::new()),
            queue: OperationSchedulerQueue {
                sender,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            receiver,
        }
    }

    /// Get a handle for scheduling from other threads.
    pub fn queue(&self) -> OperationSchedulerQueue {
        self.queue.clone()
    }

    /// Remove a live operation immediately, from the loop thread.
    ///
    /// Unlike the queued [`OperationScheduler::unschedule_operation`], this
    /// reports an id that is not currently live.
    pub fn remove_operation(&self, id: OperationId) -> Result<(), SchedulerError> {
        let mut operations = self.operations.lock();
        let before = operations.len();
        operations.retain(|(op_id, _)| *op_id != id);
        if operations.len() == before {
            Err(SchedulerError::InvalidOperationId)
        } else {
            Ok(())
        }
    }

    /// Number of live operations (queued commands not yet applied are excluded).
    pub fn operation_count(&self) -> usize {
        self.operations.lock().len()
    }

    /// Number of live intervals.
    pub fn interval_count(&self) -> usize {
        self.intervals.lock().len()
    }

    /// Drive every operation and interval by one frame.
    #[tracing::instrument(skip(self), target = "hudkit::scheduler", level = "trace")]
    pub fn update(&self, game_time: u64, frame_time: u64, unit: TimingUnit) {
        self.apply_queued_commands();

        {
            let mut operations = self.operations.lock();
            operations.retain_mut(|(id, operation)| {
                if !operation.is_alive() {
                    tracing::trace!(target: "hudkit::scheduler", ?id, "dropping dead operation");
                    return false;
                }
                operation.update(game_time, frame_time, unit);
                operation.is_persistent() && operation.is_alive()
            });
        }

        let now = unit.to_duration(game_time);
        let mut intervals = self.intervals.lock();
        intervals.retain_mut(|(_, interval)| {
            if interval.is_alive() {
                interval.check(now);
            }
            interval.is_alive()
        });
    }

    fn apply_queued_commands(&self) {
        for command in self.receiver.try_iter() {
            match command {
                SchedulerCommand::Schedule(id, operation) => {
                    tracing::trace!(target: "hudkit::scheduler", ?id, "scheduled operation");
                    self.operations.lock().push((id, operation));
                }
                SchedulerCommand::Unschedule(id) => {
                    self.operations.lock().retain(|(op_id, _)| *op_id != id);
                }
                SchedulerCommand::ScheduleInterval(id, interval) => {
                    tracing::trace!(target: "hudkit::scheduler", ?id, period = ?interval.period(), "scheduled interval");
                    self.intervals.lock().push((id, interval));
                }
                SchedulerCommand::UnscheduleInterval(id) => {
                    self.intervals.lock().retain(|(iv_id, _)| *iv_id != id);
                }
            }
        }
    }
}

impl OperationScheduler for OperationSchedulerImpl {
    fn schedule_operation(
        &self,
        operation: Box<dyn ScheduledOperation>,
    ) -> Result<OperationId, SchedulerError> {
        self.queue.schedule_operation(operation)
    }

    fn unschedule_operation(&self, id: OperationId) -> Result<(), SchedulerError> {
        self.queue.unschedule_operation(id)
    }

    fn schedule_interval(&self, interval: Interval) -> Result<IntervalId, SchedulerError> {
        self.queue.schedule_interval(interval)
    }

    fn unschedule_interval(&self, id: IntervalId) -> Result<(), SchedulerError> {
        self.queue.unschedule_interval(id)
    }
}

static_assertions::assert_impl_all!(OperationSchedulerQueue: Send, Sync);
static_assertions::assert_impl_all!(OperationSchedulerImpl: Send, Sync);
