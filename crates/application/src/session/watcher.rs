use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use domain::driver::DeviceEvent;
use domain::{ErrorCode, ErrorEnvelope, PrinterError, StatusEvent};

use super::printer_session::PrinterSession;
use super::registry::SlotMap;
use crate::status::{StatusHub, normalize};

/// Consumes the SDK observer channel of one session and forwards
/// status changes to the hub until the session closes.
pub(crate) struct SessionWatcher {
    session: Arc<PrinterSession>,
    events: UnboundedReceiver<DeviceEvent>,
    hub: Arc<StatusHub>,
    slots: SlotMap,
}

impl SessionWatcher {
    pub(crate) fn new(
        session: Arc<PrinterSession>,
        events: UnboundedReceiver<DeviceEvent>,
        hub: Arc<StatusHub>,
        slots: SlotMap,
    ) -> Self {
        Self {
            session,
            events,
            hub,
            slots,
        }
    }

    pub(crate) async fn run(mut self) {
        let port = self.session.port().clone();
        debug!(port = %port, "Session watcher started");

        loop {
            tokio::select! {
                _ = self.session.closed() => break,
                event = self.events.recv() => match event {
                    Some(DeviceEvent::StatusChanged) => self.on_status_changed().await,
                    Some(DeviceEvent::ConnectionLost(reason)) => {
                        self.on_connection_lost(reason).await;
                        break;
                    }
                    None => break,
                },
            }
        }

        debug!(port = %port, "Session watcher stopped");
    }

    async fn on_status_changed(&self) {
        let port = self.session.port().clone();
        let event = match self.session.status().await {
            Ok(snapshot) => StatusEvent::report(port, normalize(&snapshot)),
            Err(PrinterError::SessionClosed(_)) => return,
            Err(e) => {
                warn!(port = %port, error = %e, "Status query after change failed");
                StatusEvent::error(port, ErrorEnvelope::from_error(ErrorCode::StatusError, &e))
            }
        };
        self.hub.publish(event).await;
    }

    async fn on_connection_lost(&self, reason: String) {
        let port = self.session.port().clone();
        warn!(port = %port, reason = %reason, "Printer connection lost");

        self.hub
            .publish(StatusEvent::error(
                port.clone(),
                ErrorEnvelope::new(ErrorCode::ConnectionError, reason),
            ))
            .await;

        if let Err(e) = self.session.close().await {
            debug!(port = %port, error = %e, "Close after connection loss failed");
        }
        self.slots
            .remove_if(&port, |_, slot| slot.holds(&self.session));
    }
}
