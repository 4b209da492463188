//! In-memory notification scheduler
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Pending entries live only in memory and are lost on restart. A periodic
//! tick removes every due entry under the lock before any delivery is
//! awaited, so each entry is handed to the sink exactly once even when ticks
//! overlap. Delivery failures are logged; the entry is never re-armed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

/// A one-shot message waiting for its due time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    pub due: DateTime<Utc>,
    pub channel_id: u64,
    pub user_id: u64,
    pub body: String,
}

impl ScheduledNotification {
    pub fn new(due: DateTime<Utc>, channel_id: u64, user_id: u64, body: impl Into<String>) -> Self {
        Self {
            due,
            channel_id,
            user_id,
            body: body.into(),
        }
    }

    /// Channel text for a fired notification: a mention of the requester, then the body
    pub fn render(&self) -> String {
        format!("<@{}> {}", self.user_id, self.body)
    }
}

#[derive(Debug, Error)]
#[error("delivery to channel {channel_id} failed: {reason}")]
pub struct DeliveryError {
    pub channel_id: u64,
    pub reason: String,
}

impl DeliveryError {
    pub fn new(channel_id: u64, reason: impl Into<String>) -> Self {
        Self {
            channel_id,
            reason: reason.into(),
        }
    }
}

/// Where fired notifications are sent
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, channel_id: u64, text: &str) -> Result<(), DeliveryError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub delivered: usize,
    pub failed: usize,
}

impl TickReport {
    pub fn fired(&self) -> usize {
        self.delivered + self.failed
    }
}

#[derive(Clone, Default)]
pub struct NotificationScheduler {
    pending: Arc<Mutex<Vec<ScheduledNotification>>>,
}

impl NotificationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification. Past due times are accepted and fire on the next tick.
    pub async fn schedule(&self, notification: ScheduledNotification) {
        debug!(
            "Scheduled notification for user {} in channel {} at {}",
            notification.user_id, notification.channel_id, notification.due
        );
        self.pending.lock().await.push(notification);
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Copy of the pending set, in scheduling order
    pub async fn pending(&self) -> Vec<ScheduledNotification> {
        self.pending.lock().await.clone()
    }

    /// Remove and return every entry with `due <= now`
    async fn take_due(&self, now: DateTime<Utc>) -> Vec<ScheduledNotification> {
        let mut pending = self.pending.lock().await;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut *pending)
            .into_iter()
            .partition(|n| n.due <= now);
        *pending = waiting;
        due
    }

    /// Fire everything due at `now` through `sink`
    pub async fn tick(&self, now: DateTime<Utc>, sink: &dyn DeliverySink) -> TickReport {
        let due = self.take_due(now).await;
        let mut report = TickReport::default();

        for notification in due {
            match sink.deliver(notification.channel_id, &notification.render()).await {
                Ok(()) => {
                    debug!(
                        "Delivered notification for user {} (due {})",
                        notification.user_id, notification.due
                    );
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!("Dropping notification for user {}: {e}", notification.user_id);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Tick forever at a fixed period
    pub async fn run(self, sink: Arc<dyn DeliverySink>, clock: Arc<dyn Clock>, period: Duration) {
        info!("⏰ Notification scheduler started (every {}s)", period.as_secs_f32());
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let report = self.tick(clock.now(), sink.as_ref()).await;
            if report.fired() > 0 {
                info!(
                    "⏰ Fired {} notifications ({} failed)",
                    report.fired(),
                    report.failed
                );
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FixedClock, RecordingSink};
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn test_due_entry_fires_once_and_is_removed() {
        let scheduler = NotificationScheduler::new();
        let sink = RecordingSink::default();
        scheduler
            .schedule(ScheduledNotification::new(at(10, 0), 7, 42, "時間だよ！"))
            .await;

        let report = scheduler.tick(at(10, 0), &sink).await;
        assert_eq!(report, TickReport { delivered: 1, failed: 0 });
        assert_eq!(scheduler.pending_count().await, 0);

        let again = scheduler.tick(at(10, 0), &sink).await;
        assert_eq!(again.fired(), 0);
        assert_eq!(sink.sent(), vec![(7, "<@42> 時間だよ！".to_string())]);
    }

    #[tokio::test]
    async fn test_future_entry_left_untouched() {
        let scheduler = NotificationScheduler::new();
        let sink = RecordingSink::default();
        let entry = ScheduledNotification::new(at(10, 1), 7, 42, "later");
        scheduler.schedule(entry.clone()).await;

        let report = scheduler.tick(at(10, 0), &sink).await;
        assert_eq!(report.fired(), 0);
        assert_eq!(scheduler.pending().await, vec![entry]);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_past_due_time_fires_on_next_tick() {
        let scheduler = NotificationScheduler::new();
        let sink = RecordingSink::default();
        scheduler
            .schedule(ScheduledNotification::new(at(1, 0), 7, 42, "late"))
            .await;

        assert_eq!(scheduler.tick(at(9, 0), &sink).await.delivered, 1);
    }

    #[tokio::test]
    async fn test_duplicates_are_independent_entries() {
        let scheduler = NotificationScheduler::new();
        let sink = RecordingSink::default();
        let entry = ScheduledNotification::new(at(6, 30), 7, 42, "起きて！");
        scheduler.schedule(entry.clone()).await;
        scheduler.schedule(entry).await;
        assert_eq!(scheduler.pending_count().await, 2);

        let report = scheduler.tick(at(6, 30), &sink).await;
        assert_eq!(report.delivered, 2);
        assert_eq!(sink.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_removes_entry() {
        let scheduler = NotificationScheduler::new();
        let sink = RecordingSink::failing_on(13);
        scheduler
            .schedule(ScheduledNotification::new(at(10, 0), 13, 1, "lost"))
            .await;
        scheduler
            .schedule(ScheduledNotification::new(at(10, 0), 7, 2, "kept"))
            .await;

        let report = scheduler.tick(at(10, 5), &sink).await;
        assert_eq!(report, TickReport { delivered: 1, failed: 1 });
        assert_eq!(scheduler.pending_count().await, 0);
        assert_eq!(sink.sent(), vec![(7, "<@2> kept".to_string())]);
    }

    #[tokio::test]
    async fn test_mixed_due_and_waiting_entries() {
        let scheduler = NotificationScheduler::new();
        let sink = RecordingSink::default();
        for minute in [0, 10, 20, 30] {
            scheduler
                .schedule(ScheduledNotification::new(at(12, minute), 7, 1, format!("m{minute}")))
                .await;
        }

        assert_eq!(scheduler.tick(at(12, 15), &sink).await.delivered, 2);
        let waiting: Vec<String> = scheduler
            .pending()
            .await
            .into_iter()
            .map(|n| n.body)
            .collect();
        assert_eq!(waiting, vec!["m20", "m30"]);
    }

    #[tokio::test]
    async fn test_concurrent_ticks_never_double_fire() {
        let scheduler = NotificationScheduler::new();
        let sink = Arc::new(RecordingSink::default());
        for i in 0..50 {
            scheduler
                .schedule(ScheduledNotification::new(at(8, 0), i, 1, "ping"))
                .await;
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let scheduler = scheduler.clone();
            let sink = sink.clone();
            handles.push(tokio::spawn(async move {
                scheduler.tick(at(8, 0), sink.as_ref()).await.delivered
            }));
        }

        let mut total = 0;
        for handle in handles {
            total += handle.await.unwrap();
        }
        assert_eq!(total, 50);
        assert_eq!(sink.sent().len(), 50);
    }

    #[tokio::test]
    async fn test_run_loop_fires_due_entries() {
        let scheduler = NotificationScheduler::new();
        let sink = Arc::new(RecordingSink::default());
        scheduler
            .schedule(ScheduledNotification::new(at(8, 0), 7, 1, "loop"))
            .await;

        let runner = scheduler.clone();
        let task_sink: Arc<dyn DeliverySink> = sink.clone();
        let handle = tokio::spawn(runner.run(
            task_sink,
            Arc::new(FixedClock(at(8, 0))),
            Duration::from_millis(10),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(sink.sent(), vec![(7, "<@1> loop".to_string())]);
        assert_eq!(scheduler.pending_count().await, 0);
    }
}
