//! Core systems for hudkit.
//!
//! This crate provides the foundational pieces shared by the hudkit crates:
//!
//! - **Errors**: [`HudError`], the configuration/usage error taxonomy of the widget tree
//! - **Signals**: [`Signal`], listener lists for widget notifications
//! - **Scheduler**: [`OperationSchedulerImpl`], periodic dispatch of time-based operations
//! - **Logging**: tracing targets and a widget tree dump formatter
//!
//! # Signal Example
//!
//! ```
//! use hudkit_core::Signal;
//!
//! let focus_gained = Signal::<u32>::new();
//! focus_gained.connect(|widget| println!("widget {widget} gained focus"));
//! focus_gained.emit(7);
//! ```

mod error;
pub mod logging;
mod scheduler;
pub mod signal;

pub use error::{HudError, HudResult, SchedulerError};
pub use logging::{DebugTree, PerfSpan, TreeFormatOptions, TreeStyle, WidgetTreeDebug};
pub use scheduler::{
    Interval, IntervalEvent, IntervalId, OperationId, OperationScheduler, OperationSchedulerImpl,
    OperationSchedulerQueue, ScheduledOperation, TimingUnit,
};
pub use signal::{ConnectionId, Signal};
