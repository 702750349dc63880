use orison_models::chrono::NaiveDate;
use orison_models::reminder::{Reminder, ReminderId};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct AddReminderRequest {
    pub user: String,
    pub time: String,
    #[serde(default)]
    pub scripture: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EditReminderRequest {
    pub user: Option<String>,
    pub time: Option<String>,
    pub scripture: Option<String>,
}

/// Wire shape expected by the mobile client: the firing time travels under
/// the `time` key.
#[derive(Serialize, Debug)]
pub struct ReminderResponse {
    pub id: ReminderId,
    pub user: String,
    pub time: String,
    pub scripture: Option<String>,
    pub last_triggered_date: Option<NaiveDate>,
}

impl From<Reminder> for ReminderResponse {
    fn from(value: Reminder) -> Self {
        Self {
            id: value.id,
            user: value.user,
            time: value.time_of_day,
            scripture: value.scripture,
            last_triggered_date: value.last_triggered_date,
        }
    }
}
