
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orison_models::chrono::{NaiveDate, NaiveDateTime};
use orison_models::reminder::{Reminder, ReminderFireTime};
use orison_storage::memory::InMemoryReminderStorage;
use orison_storage::{NewReminder, ReminderStorage};

use crate::clock::Clock;
use crate::delivery::{DeliveryReceipt, NotificationGateway};
use crate::poller::PollingReminderScheduler;

pub(crate) type SentMessages = Arc<Mutex<Vec<String>>>;

pub(crate) enum GatewayBehavior {
    Deliver,
    Fail,
    Stall,
}

pub(crate) struct RecordingGateway {
    sent: SentMessages,
    behavior: GatewayBehavior,
}

#[async_trait]
impl NotificationGateway for RecordingGateway {
    async fn send(
        &self,
        message: &str,
    ) -> Result<DeliveryReceipt, Box<dyn std::error::Error + Send + Sync>> {
        self.sent.lock().unwrap().push(message.to_owned());
        match self.behavior {
            GatewayBehavior::Deliver => Ok(DeliveryReceipt {
                delivered: true,
                detail: "accepted".to_owned(),
            }),
            GatewayBehavior::Fail => Err("provider rejected the notification".into()),
            GatewayBehavior::Stall => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

pub(crate) struct FixedClock(Mutex<NaiveDateTime>);

impl FixedClock {
    pub fn at(datetime: NaiveDateTime) -> Arc<Self> {
        Arc::new(Self(Mutex::new(datetime)))
    }

    pub fn set(&self, datetime: NaiveDateTime) {
        *self.0.lock().unwrap() = datetime;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

pub(crate) struct TestContext {
    pub storage: Arc<InMemoryReminderStorage>,
    pub sent: SentMessages,
    pub clock: Arc<FixedClock>,
    pub scheduler: PollingReminderScheduler,
}

impl TestContext {
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_gateway(now, GatewayBehavior::Deliver)
    }

    pub fn with_gateway(now: NaiveDateTime, behavior: GatewayBehavior) -> Self {
        let storage = Arc::new(InMemoryReminderStorage::new());
        let sent: SentMessages = Arc::new(Mutex::new(Vec::new()));
        let gateway = Arc::new(RecordingGateway {
            sent: Arc::clone(&sent),
            behavior,
        });
        let clock = FixedClock::at(now);
        let scheduler =
            PollingReminderScheduler::new(storage.clone(), gateway, clock.clone());

        Self {
            storage,
            sent,
            clock,
            scheduler,
        }
    }

    pub async fn add_reminder(
        &self,
        user: &str,
        time: &str,
        scripture: Option<&str>,
    ) -> Reminder {
        self.storage
            .insert(NewReminder {
                user: user.to_owned(),
                fire_at: ReminderFireTime::parse(time).unwrap(),
                scripture: scripture.map(str::to_owned),
            })
            .await
            .unwrap()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

pub(crate) fn datetime(hours: u32, minutes: u32) -> NaiveDateTime {
    datetime_on(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), hours, minutes)
}

pub(crate) fn datetime_on(date: NaiveDate, hours: u32, minutes: u32) -> NaiveDateTime {
    date.and_hms_opt(hours, minutes, 0).unwrap()
}
