use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod sink;
pub use sink::StatusSink;

use crate::error::ErrorEnvelope;
use crate::port::PortId;
use crate::status::StatusReport;

/// Push notification raised when a connected printer changes state
/// outside of any pending request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub port: PortId,
    pub payload: StatusPayload,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StatusPayload {
    Report(StatusReport),
    Error(ErrorEnvelope),
}

impl StatusEvent {
    /// Create a status report event
    pub fn report(port: PortId, report: StatusReport) -> Self {
        Self {
            port,
            payload: StatusPayload::Report(report),
            timestamp: Utc::now(),
        }
    }

    /// Create an error event
    pub fn error(port: PortId, error: ErrorEnvelope) -> Self {
        Self {
            port,
            payload: StatusPayload::Error(error),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, StatusPayload::Error(_))
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &str {
        match self.payload {
            StatusPayload::Report(_) => "status",
            StatusPayload::Error(_) => "error",
        }
    }
}
