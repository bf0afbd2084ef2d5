use crate::event::StatusEvent;
use async_trait::async_trait;

/// Receiver side of a status subscription
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn publish(
        &self,
        event: StatusEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
