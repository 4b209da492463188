//! # Feature: Timers
//!
//! One-shot /timer and /alarm notifications. Pending entries are held in memory
//! and fired by a fixed-interval scan; they do not survive a restart.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod delivery;
pub mod schedule;
pub mod scheduler;

pub use delivery::SerenityDelivery;
pub use schedule::{
    delay_from, next_alarm, AlarmRequest, AlarmTime, ScheduleError, TimerRequest,
    DEFAULT_ALARM_MESSAGE, DEFAULT_TIMER_MESSAGE,
};
pub use scheduler::{
    Clock, DeliveryError, DeliverySink, NotificationScheduler, ScheduledNotification,
    SystemClock, TickReport,
};
