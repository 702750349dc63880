use orison_models::chrono::{Local, NaiveDateTime};

/// Source of "now" for the scan loop. It is read exactly once per tick so
/// that every reminder in a scan is judged against the same snapshot.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time. Reminder times carry no timezone; they mean
/// whatever the host clock says.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
