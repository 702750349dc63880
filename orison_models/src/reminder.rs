use chrono::{NaiveDate, NaiveTime, Timelike};
use thiserror::Error;

pub type ReminderId = i64;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a valid HH:MM time of day: {0:?}")]
pub struct InvalidFireTime(pub String);

/// Wall-clock firing time, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFireTime(NaiveTime);

impl ReminderFireTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_second(0)
            .and_then(|time| time.with_nanosecond(0))
            .expect("Will never fail.");
        Self(normalized_time)
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidFireTime> {
        let time = NaiveTime::parse_from_str(raw, "%H:%M")
            .map_err(|_| InvalidFireTime(raw.to_owned()))?;

        Ok(Self::new(time))
    }

    pub fn time(&self) -> &NaiveTime {
        &self.0
    }

    pub fn into_time(self) -> NaiveTime {
        self.0
    }
}

impl std::fmt::Display for ReminderFireTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ReminderId,
    pub user: String,
    /// Raw stored value. Kept unparsed so that a malformed row can still be
    /// read, reported and skipped instead of poisoning a whole table scan.
    pub time_of_day: String,
    pub scripture: Option<String>,
    pub last_triggered_date: Option<NaiveDate>,
}

impl Reminder {
    pub fn fire_time(&self) -> Result<ReminderFireTime, InvalidFireTime> {
        ReminderFireTime::parse(&self.time_of_day)
    }
}
