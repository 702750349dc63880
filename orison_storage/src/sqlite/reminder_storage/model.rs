use orison_models::chrono::NaiveDate;
use orison_models::reminder::Reminder;

#[derive(sqlx::FromRow)]
pub struct ReminderStorageModel {
    pub id: i64,
    pub user: String,
    pub time_of_day: String,
    pub scripture: Option<String>,
    pub last_triggered_date: Option<NaiveDate>,
}

impl From<ReminderStorageModel> for Reminder {
    fn from(value: ReminderStorageModel) -> Self {
        Self {
            id: value.id,
            user: value.user,
            time_of_day: value.time_of_day,
            scripture: value.scripture,
            last_triggered_date: value.last_triggered_date,
        }
    }
}
