mod model;

use async_trait::async_trait;
use model::ReminderStorageModel;
use orison_models::chrono::NaiveDate;
use orison_models::reminder::{Reminder, ReminderId};

use crate::model::{NewReminder, UpdateReminder};
use crate::reminder::{ReminderStorage, StorageError};

pub struct SqliteReminderStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteReminderStorage {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the reminders table when it is missing. The deployment has no
    /// migration tooling; the schema is owned here.
    pub async fn init(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS reminders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                time_of_day TEXT NOT NULL,
                scripture TEXT,
                last_triggered_date TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ReminderStorage for SqliteReminderStorage {
    async fn insert(&self, reminder: NewReminder) -> Result<Reminder, StorageError> {
        let fire_at = reminder.fire_at.to_string();
        let created = sqlx::query_as::<_, ReminderStorageModel>(
            "INSERT INTO reminders (user, time_of_day, scripture)
             VALUES (?, ?, ?) RETURNING *",
        )
        .bind(reminder.user)
        .bind(fire_at)
        .bind(reminder.scripture)
        .fetch_one(&self.pool)
        .await?;

        Ok(created.into())
    }

    async fn update(&self, update: UpdateReminder) -> Result<Reminder, StorageError> {
        let fire_at = update.fire_at.map(|time| time.to_string());
        let updated = sqlx::query_as::<_, ReminderStorageModel>(
            "UPDATE reminders
             SET user = COALESCE(?, user),
                 time_of_day = COALESCE(?, time_of_day),
                 scripture = COALESCE(?, scripture)
             WHERE id = ?
             RETURNING *",
        )
        .bind(update.user)
        .bind(fire_at)
        .bind(update.scripture)
        .bind(update.id)
        .fetch_optional(&self.pool)
        .await?;

        updated
            .map(Into::into)
            .ok_or(StorageError::NotFound(update.id))
    }

    async fn delete(&self, id: ReminderId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }

        Ok(())
    }

    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        let reminder =
            sqlx::query_as::<_, ReminderStorageModel>("SELECT * FROM reminders WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reminder.map(Into::into))
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StorageError> {
        let reminders =
            sqlx::query_as::<_, ReminderStorageModel>("SELECT * FROM reminders ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(reminders.into_iter().map(Into::into).collect())
    }

    async fn set_last_triggered(
        &self,
        id: ReminderId,
        date: NaiveDate,
    ) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE reminders SET last_triggered_date = ? WHERE id = ?")
            .bind(date)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }

        Ok(())
    }
}
