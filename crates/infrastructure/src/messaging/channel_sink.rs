use async_trait::async_trait;
use tokio::sync::mpsc;

use domain::StatusEvent;
use domain::event::StatusSink;

/// Forwards status events into an mpsc channel
#[derive(Clone)]
pub struct ChannelStatusSink {
    tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ChannelStatusSink {
    pub fn new(tx: mpsc::UnboundedSender<StatusEvent>) -> Self {
        Self { tx }
    }

    /// Builds a sink together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl StatusSink for ChannelStatusSink {
    async fn publish(
        &self,
        event: StatusEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tx.send(event)?;
        Ok(())
    }
}
