//! Line framing for requests, responses and pushed events.
//!
//! ```text
//! -> {"id": 1, "method": "connect", "arguments": {"portName": "TCP:10.0.0.5", "emulation": "StarPRNT"}}
//! <- {"id": 1, "result": null}
//! <- {"event": "status", "portName": "TCP:10.0.0.5", "status": {...}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use application::{MethodCall, MethodResponse};
use domain::{ErrorCode, ErrorEnvelope, PortId, StatusEvent, StatusPayload, StatusReport};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl Request {
    /// Parses one input line. A malformed line yields the error response
    /// to send back instead.
    pub fn parse(line: &str) -> Result<Self, Response> {
        serde_json::from_str(line).map_err(|e| Response {
            id: None,
            body: ResponseBody::Error(ErrorEnvelope::new(
                ErrorCode::InvalidArgument,
                format!("Malformed request: {e}"),
            )),
        })
    }

    pub fn into_call(self) -> (u64, MethodCall) {
        (self.id, MethodCall::new(self.method, self.arguments))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub id: Option<u64>,
    #[serde(flatten)]
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseBody {
    Result(Value),
    Error(ErrorEnvelope),
    NotImplemented(bool),
}

impl Response {
    pub fn new(id: u64, response: MethodResponse) -> Self {
        let body = match response {
            MethodResponse::Success(value) => ResponseBody::Result(value),
            MethodResponse::Error(envelope) => ResponseBody::Error(envelope),
            MethodResponse::NotImplemented => ResponseBody::NotImplemented(true),
        };
        Self { id: Some(id), body }
    }
}

/// Pushed status notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EventLine {
    Status {
        #[serde(rename = "portName")]
        port_name: PortId,
        status: StatusReport,
    },
    Error {
        #[serde(rename = "portName")]
        port_name: PortId,
        error: ErrorEnvelope,
    },
}

impl From<StatusEvent> for EventLine {
    fn from(event: StatusEvent) -> Self {
        match event.payload {
            StatusPayload::Report(status) => Self::Status {
                port_name: event.port,
                status,
            },
            StatusPayload::Error(error) => Self::Error {
                port_name: event.port,
                error,
            },
        }
    }
}
