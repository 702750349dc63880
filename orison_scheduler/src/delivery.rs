use async_trait::async_trait;

/// Outcome reported by the push provider. `detail` carries the provider
/// response on success and the error text on failure.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub delivered: bool,
    pub detail: String,
}

#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    async fn send(
        &self,
        message: &str,
    ) -> Result<DeliveryReceipt, Box<dyn std::error::Error + Send + Sync>>;
}
