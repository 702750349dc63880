mod appsettings;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use appsettings::AppSettings;
use orison_api::AppState;
use orison_push::OneSignalGateway;
use orison_scheduler::{PollingReminderScheduler, SystemClock};
use orison_storage::ReminderStorage;
use orison_storage::sqlite::SqliteReminderStorage;
use sqlx::sqlite::SqlitePoolOptions;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load().context("Failed to load application settings")?;

    let pool = SqlitePoolOptions::new()
        .connect(&settings.database.url)
        .await
        .context("Failed to open the reminders database")?;

    let storage = SqliteReminderStorage::new(pool);
    storage.init().await?;
    let storage: Arc<dyn ReminderStorage> = Arc::new(storage);

    let gateway = Arc::new(OneSignalGateway::new(settings.push.clone()));
    let scheduler = PollingReminderScheduler::new(
        Arc::clone(&storage),
        gateway,
        Arc::new(SystemClock),
    )
    .with_intervals(
        Duration::from_secs(settings.scheduler.poll_interval_secs),
        Duration::from_secs(settings.scheduler.gateway_timeout_secs),
    );

    let cancellation_token = CancellationToken::new();
    let scheduler_token = cancellation_token.clone();
    let scheduler_task = tokio::spawn(async move {
        scheduler.run(scheduler_token).await;
    });

    let app = orison_api::router(AppState { storage });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    log::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancellation_token.cancel();
    scheduler_task.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("Could not listen for shutdown signal: {error}");
    }
}
