mod model;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use orison_models::reminder::{ReminderFireTime, ReminderId};
use orison_storage::{NewReminder, ReminderStorage, StorageError, UpdateReminder};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

pub use model::{AddReminderRequest, EditReminderRequest, ReminderResponse};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ReminderStorage>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/add_reminder", post(add_reminder))
        .route("/reminders", get(list_reminders))
        .route(
            "/reminder/:id",
            put(update_reminder).delete(delete_reminder),
        )
        .layer(cors)
        .with_state(state)
}

async fn index() -> &'static str {
    "Welcome to the Orison prayer reminder API!"
}

pub async fn add_reminder(
    State(state): State<AppState>,
    Json(request): Json<AddReminderRequest>,
) -> Response {
    let fire_at = match ReminderFireTime::parse(&request.time) {
        Ok(fire_at) => fire_at,
        Err(error) => return (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    };

    let new_reminder = NewReminder {
        user: request.user,
        fire_at,
        scripture: request.scripture,
    };

    match state.storage.insert(new_reminder).await {
        Ok(reminder) => {
            log::info!("Added reminder for {} at {}", reminder.user, reminder.time_of_day);
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Prayer reminder added!",
                    "reminder": ReminderResponse::from(reminder),
                })),
            )
                .into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub async fn list_reminders(State(state): State<AppState>) -> Response {
    match state.storage.get_all().await {
        Ok(reminders) => {
            let reminders: Vec<ReminderResponse> =
                reminders.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(reminders)).into_response()
        }
        Err(error) => internal_error(error),
    }
}

pub async fn update_reminder(
    State(state): State<AppState>,
    Path(id): Path<ReminderId>,
    Json(request): Json<EditReminderRequest>,
) -> Response {
    let fire_at = match request
        .time
        .as_deref()
        .map(ReminderFireTime::parse)
        .transpose()
    {
        Ok(fire_at) => fire_at,
        Err(error) => return (StatusCode::BAD_REQUEST, error.to_string()).into_response(),
    };

    let update = UpdateReminder {
        id,
        user: request.user,
        fire_at,
        scripture: request.scripture,
    };

    match state.storage.update(update).await {
        Ok(reminder) => {
            log::info!("Updated reminder {id}");
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Reminder updated!",
                    "reminder": ReminderResponse::from(reminder),
                })),
            )
                .into_response()
        }
        Err(StorageError::NotFound(_)) => not_found(),
        Err(error) => internal_error(error),
    }
}

pub async fn delete_reminder(State(state): State<AppState>, Path(id): Path<ReminderId>) -> Response {
    match state.storage.delete(id).await {
        Ok(()) => {
            log::info!("Deleted reminder {id}");
            (StatusCode::OK, Json(json!({ "message": "Reminder deleted!" }))).into_response()
        }
        Err(StorageError::NotFound(_)) => not_found(),
        Err(error) => internal_error(error),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Reminder not found.").into_response()
}

fn internal_error(error: StorageError) -> Response {
    log::error!("Storage error: {error}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Storage error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orison_storage::memory::InMemoryReminderStorage;

    fn state() -> AppState {
        AppState {
            storage: Arc::new(InMemoryReminderStorage::new()),
        }
    }

    fn add_request(user: &str, time: &str, scripture: Option<&str>) -> AddReminderRequest {
        AddReminderRequest {
            user: user.to_owned(),
            time: time.to_owned(),
            scripture: scripture.map(str::to_owned),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn add_reminder_returns_created_record() {
        let state = state();

        let response = add_reminder(
            State(state.clone()),
            Json(add_request("Ann", "07:30", Some("John 3:16"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Prayer reminder added!");
        assert_eq!(body["reminder"]["user"], "Ann");
        assert_eq!(body["reminder"]["time"], "07:30");
        assert_eq!(body["reminder"]["scripture"], "John 3:16");
        assert_eq!(body["reminder"]["last_triggered_date"], serde_json::Value::Null);

        let stored = state.storage.get_all().await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn add_reminder_rejects_invalid_time() {
        let state = state();

        let response =
            add_reminder(State(state.clone()), Json(add_request("Ann", "25:99", None))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(state.storage.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_reminder_normalizes_unpadded_hours() {
        let state = state();

        let response =
            add_reminder(State(state.clone()), Json(add_request("Ann", "7:05", None))).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = state.storage.get_all().await.unwrap();
        assert_eq!(stored[0].time_of_day, "07:05");
    }

    #[tokio::test]
    async fn list_reminders_returns_every_record() {
        let state = state();
        add_reminder(State(state.clone()), Json(add_request("Ann", "07:30", None))).await;
        add_reminder(State(state.clone()), Json(add_request("Ben", "08:00", None))).await;

        let response = list_reminders(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["user"], "Ann");
        assert_eq!(body[1]["user"], "Ben");
    }

    #[tokio::test]
    async fn update_reminder_patches_fields() {
        let state = state();
        add_reminder(State(state.clone()), Json(add_request("Ann", "07:30", None))).await;
        let id = state.storage.get_all().await.unwrap()[0].id;

        let response = update_reminder(
            State(state.clone()),
            Path(id),
            Json(EditReminderRequest {
                time: Some("09:15".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reminder"]["user"], "Ann");
        assert_eq!(body["reminder"]["time"], "09:15");
    }

    #[tokio::test]
    async fn update_unknown_reminder_is_not_found() {
        let response = update_reminder(
            State(state()),
            Path(42),
            Json(EditReminderRequest::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_rejects_invalid_time() {
        let state = state();
        add_reminder(State(state.clone()), Json(add_request("Ann", "07:30", None))).await;
        let id = state.storage.get_all().await.unwrap()[0].id;

        let response = update_reminder(
            State(state.clone()),
            Path(id),
            Json(EditReminderRequest {
                time: Some("25:99".to_owned()),
                ..Default::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.storage.get_all().await.unwrap()[0].time_of_day, "07:30");
    }

    #[tokio::test]
    async fn delete_reminder_removes_the_record() {
        let state = state();
        add_reminder(State(state.clone()), Json(add_request("Ann", "07:30", None))).await;
        let id = state.storage.get_all().await.unwrap()[0].id;

        let response = delete_reminder(State(state.clone()), Path(id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.storage.get_all().await.unwrap().is_empty());

        let response = delete_reminder(State(state), Path(id)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
