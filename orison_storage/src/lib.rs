mod model;
mod reminder;

pub mod memory;
pub mod sqlite;

pub use model::{NewReminder, UpdateReminder};
pub use reminder::{ReminderStorage, StorageError};
