use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use domain::PortId;
use domain::event::{StatusEvent, StatusSink};

/// Identifies one registration on the [`StatusHub`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(Uuid);

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Subscriber {
    port: Option<PortId>,
    sink: Arc<dyn StatusSink>,
}

impl Subscriber {
    fn wants(&self, event: &StatusEvent) -> bool {
        self.port.as_ref().is_none_or(|port| port == &event.port)
    }
}

/// Fans out asynchronous status events to subscribed sinks
#[derive(Default)]
pub struct StatusHub {
    subscribers: Mutex<HashMap<SubscriptionHandle, Subscriber>>,
}

impl StatusHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sink` for events from `port`, or from every port when `None`
    pub async fn subscribe(
        &self,
        port: Option<PortId>,
        sink: Arc<dyn StatusSink>,
    ) -> SubscriptionHandle {
        let handle = SubscriptionHandle(Uuid::new_v4());
        debug!(subscription = %handle, port = ?port, "Status subscription added");
        self.subscribers
            .lock()
            .await
            .insert(handle, Subscriber { port, sink });
        handle
    }

    /// Returns false if the handle was not registered
    pub async fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let removed = self.subscribers.lock().await.remove(&handle).is_some();
        if removed {
            debug!(subscription = %handle, "Status subscription removed");
        }
        removed
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Delivers the event to every matching sink. Sink failures are logged.
    pub async fn publish(&self, event: StatusEvent) {
        let sinks: Vec<Arc<dyn StatusSink>> = self
            .subscribers
            .lock()
            .await
            .values()
            .filter(|subscriber| subscriber.wants(&event))
            .map(|subscriber| subscriber.sink.clone())
            .collect();

        if sinks.is_empty() {
            debug!(port = %event.port, "No status subscribers, event dropped");
            return;
        }

        for sink in sinks {
            if let Err(e) = sink.publish(event.clone()).await {
                warn!(port = %event.port, error = %e, "Failed to deliver status event");
            }
        }
    }
}
