use std::collections::HashMap;

use async_trait::async_trait;
use orison_models::chrono::NaiveDate;
use orison_models::reminder::{Reminder, ReminderId};
use tokio::sync::RwLock;

use crate::model::{NewReminder, UpdateReminder};
use crate::reminder::{ReminderStorage, StorageError};

#[derive(Default)]
pub struct InMemoryReminderStorage {
    store: RwLock<(ReminderId, HashMap<ReminderId, Reminder>)>,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a row exactly as it would be read from the table, validity
    /// unchecked. External tools can leave malformed rows behind and the
    /// scan loop has to cope with them.
    pub async fn insert_raw(&self, reminder: Reminder) {
        let mut store = self.store.write().await;
        store.0 = store.0.max(reminder.id);
        store.1.insert(reminder.id, reminder);
    }
}

#[async_trait]
impl ReminderStorage for InMemoryReminderStorage {
    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError> {
        let mut store = self.store.write().await;
        store.0 += 1;
        let id = store.0;
        let created = Reminder {
            id,
            user: reminder.user,
            time_of_day: reminder.fire_at.to_string(),
            scripture: reminder.scripture,
            last_triggered_date: None,
        };

        store.1.insert(id, created.clone());

        Ok(created)
    }

    async fn update(&self, update: UpdateReminder) -> Result<Reminder, StorageError> {
        let mut store = self.store.write().await;
        let reminder = store
            .1
            .get_mut(&update.id)
            .ok_or(StorageError::NotFound(update.id))?;

        if let Some(user) = update.user {
            reminder.user = user;
        }
        if let Some(fire_at) = update.fire_at {
            reminder.time_of_day = fire_at.to_string();
        }
        if let Some(scripture) = update.scripture {
            reminder.scripture = Some(scripture);
        }

        Ok(reminder.clone())
    }

    async fn delete(&self, id: ReminderId) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store
            .1
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }

    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        let store = self.store.read().await;
        Ok(store.1.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        let mut reminders: Vec<Reminder> = store.1.values().cloned().collect();
        reminders.sort_by_key(|reminder| reminder.id);

        Ok(reminders)
    }

    async fn set_last_triggered(
        &self,
        id: ReminderId,
        date: NaiveDate,
    ) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        let reminder = store.1.get_mut(&id).ok_or(StorageError::NotFound(id))?;
        reminder.last_triggered_date = Some(date);

        Ok(())
    }
}
