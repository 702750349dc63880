use std::sync::Arc;
use std::time::Duration;

use orison_models::chrono::{NaiveDate, NaiveTime, Timelike};
use orison_models::reminder::Reminder;
use orison_storage::ReminderStorage;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::delivery::NotificationGateway;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Scans the whole reminder table once a minute and fires every reminder
/// whose time-of-day matches the current minute and which has not fired yet
/// today. Firing is at-most-once per calendar day: the daily marker is
/// written whether or not delivery succeeded.
pub struct PollingReminderScheduler {
    storage: Arc<dyn ReminderStorage>,
    gateway: Arc<dyn NotificationGateway>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    gateway_timeout: Duration,
}

impl PollingReminderScheduler {
    pub fn new(
        storage: Arc<dyn ReminderStorage>,
        gateway: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            gateway,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    pub fn with_intervals(mut self, poll_interval: Duration, gateway_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.gateway_timeout = gateway_timeout;
        self
    }

    /// Runs until the token is cancelled. The first scan happens immediately,
    /// then one scan starts every `poll_interval` regardless of how long the
    /// previous scan took.
    pub async fn run(&self, cancellation_token: CancellationToken) {
        let mut ticks = tokio::time::interval(self.poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Starting reminder scan loop [interval = {:?}]",
            self.poll_interval
        );

        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => {
                    log::info!("Reminder scan loop shutting down");
                    break;
                }
                _ = ticks.tick() => {
                    self.run_tick().await;
                }
            }
        }
    }

    /// One scan. "now" is captured once up front so every reminder in the
    /// scan is judged against the same minute and the same day.
    pub async fn run_tick(&self) {
        let now = self.clock.now();
        let now_minute = truncate_to_minute(now.time());
        let today = now.date();

        let reminders = match self.storage.get_all().await {
            Ok(reminders) => reminders,
            Err(error) => {
                log::error!("Skipping scan, could not read reminders: {error}");
                return;
            }
        };

        for reminder in reminders {
            self.check_reminder(&reminder, now_minute, today).await;
        }
    }

    async fn check_reminder(&self, reminder: &Reminder, now_minute: NaiveTime, today: NaiveDate) {
        let fire_at = match reminder.fire_time() {
            Ok(fire_at) => fire_at,
            Err(error) => {
                log::warn!("Skipping reminder {}: {error}", reminder.id);
                return;
            }
        };

        if *fire_at.time() != now_minute || reminder.last_triggered_date == Some(today) {
            return;
        }

        self.fire(reminder, today).await;
    }

    /// Delivery failure or timeout is logged and the daily marker is still
    /// written: a lost notification is preferred over duplicate daily spam.
    async fn fire(&self, reminder: &Reminder, today: NaiveDate) {
        let message = reminder_message(reminder);
        log::info!("Triggering notification: {message}");

        match tokio::time::timeout(self.gateway_timeout, self.gateway.send(&message)).await {
            Ok(Ok(receipt)) => {
                log::info!(
                    "Push notification response [reminder_id = {}, delivered = {}]: {}",
                    reminder.id,
                    receipt.delivered,
                    receipt.detail
                );
            }
            Ok(Err(error)) => {
                log::error!(
                    "Push delivery failed [reminder_id = {}]: {error}",
                    reminder.id
                );
            }
            Err(_) => {
                log::error!("Push delivery timed out [reminder_id = {}]", reminder.id);
            }
        }

        if let Err(error) = self.storage.set_last_triggered(reminder.id, today).await {
            log::error!(
                "Could not mark reminder {} as fired for {today}: {error}",
                reminder.id
            );
        }
    }
}

pub(crate) fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .expect("Will never fail.")
}

pub(crate) fn reminder_message(reminder: &Reminder) -> String {
    let scripture = reminder.scripture.as_deref().unwrap_or("");
    format!(
        "🙏 Hey {}, it's time to pray! Scripture: {}",
        reminder.user, scripture
    )
}
