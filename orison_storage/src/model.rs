use orison_models::reminder::{ReminderFireTime, ReminderId};

pub struct NewReminder {
    pub user: String,
    pub fire_at: ReminderFireTime,
    pub scripture: Option<String>,
}

pub struct UpdateReminder {
    pub id: ReminderId,
    pub user: Option<String>,
    pub fire_at: Option<ReminderFireTime>,
    pub scripture: Option<String>,
}
