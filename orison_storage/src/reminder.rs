use async_trait::async_trait;
use orison_models::chrono::NaiveDate;
use orison_models::reminder::{Reminder, ReminderId};
use thiserror::Error;

use crate::model::{NewReminder, UpdateReminder};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("reminder {0} does not exist")]
    NotFound(ReminderId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError>;
    async fn update(&self, reminder: UpdateReminder) -> Result<Reminder, StorageError>;
    async fn delete(&self, id: ReminderId) -> Result<(), StorageError>;
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError>;
    async fn get_all(&self) -> Result<Vec<Reminder>, StorageError>;

    /// Writes the daily fired marker and nothing else, so a concurrent field
    /// edit through the API cannot be lost to a read-modify-write race.
    async fn set_last_triggered(
        &self,
        id: ReminderId,
        date: NaiveDate,
    ) -> Result<(), StorageError>;
}
