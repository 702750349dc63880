use async_trait::async_trait;
use orison_scheduler::delivery::{DeliveryReceipt, NotificationGateway};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

pub const ONESIGNAL_API_URL: &str = "https://onesignal.com/api/v1";

#[derive(Debug, Error)]
pub enum PushDeliveryError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct PushSettings {
    pub app_id: String,
    pub api_key: String,
    #[serde(default = "default_segment")]
    pub segment: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_segment() -> String {
    "All".to_owned()
}

fn default_api_url() -> String {
    ONESIGNAL_API_URL.to_owned()
}

/// Pushes a message to every subscribed device in the configured OneSignal
/// segment. The provider response body ends up in the receipt detail so the
/// scan loop can log it.
pub struct OneSignalGateway {
    client: reqwest::Client,
    settings: PushSettings,
}

impl OneSignalGateway {
    pub fn new(settings: PushSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn notification_body(&self, message: &str) -> serde_json::Value {
        json!({
            "app_id": self.settings.app_id,
            "included_segments": [self.settings.segment],
            "contents": { "en": message },
        })
    }
}

#[async_trait]
impl NotificationGateway for OneSignalGateway {
    async fn send(
        &self,
        message: &str,
    ) -> Result<DeliveryReceipt, Box<dyn std::error::Error + Send + Sync>> {
        let url = format!("{}/notifications", self.settings.api_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&self.notification_body(message))
            .send()
            .await
            .map_err(PushDeliveryError::Http)?;

        let delivered = response.status().is_success();
        let detail = response.text().await.map_err(PushDeliveryError::Http)?;

        Ok(DeliveryReceipt { delivered, detail })
    }
}
