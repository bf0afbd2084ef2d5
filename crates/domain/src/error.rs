use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::port::PortId;

/// Opaque failure reported by the vendor SDK.
///
/// The message is surfaced to callers verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SdkError(pub String);

impl SdkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrinterError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Unsupported interface type")]
    UnsupportedInterface(String),

    #[error("Unknown interface type")]
    UnknownInterface(String),

    #[error("Printer already connected")]
    AlreadyConnected(PortId),

    #[error("Printer not connected")]
    NotConnected(PortId),

    #[error("Failed to load image {path}: {reason}")]
    ImageLoad { path: String, reason: String },

    #[error("Operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Session closed")]
    SessionClosed(PortId),

    #[error(transparent)]
    Sdk(#[from] SdkError),
}

impl PrinterError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, PrinterError>;

/// Failure codes exposed on the method channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    DiscoveryError,
    ConnectionError,
    DisconnectionError,
    PrintError,
    StatusError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::DiscoveryError => "DISCOVERY_ERROR",
            Self::ConnectionError => "CONNECTION_ERROR",
            Self::DisconnectionError => "DISCONNECTION_ERROR",
            Self::PrintError => "PRINT_ERROR",
            Self::StatusError => "STATUS_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coded failure as delivered to a caller or to the event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Wraps an error raised while serving an operation whose transport
    /// failure code is `operation_code`. Argument errors keep their own code.
    pub fn from_error(operation_code: ErrorCode, error: &PrinterError) -> Self {
        let code = if error.is_invalid_argument() {
            ErrorCode::InvalidArgument
        } else {
            operation_code
        };
        Self::new(code, error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_message_passes_through() {
        let err = PrinterError::from(SdkError::new("Printer is in use by another host"));
        assert_eq!(err.to_string(), "Printer is in use by another host");
    }

    #[test]
    fn test_reference_messages() {
        let port = PortId::new("TCP:10.0.0.5").unwrap();
        assert_eq!(
            PrinterError::AlreadyConnected(port.clone()).to_string(),
            "Printer already connected"
        );
        assert_eq!(
            PrinterError::NotConnected(port).to_string(),
            "Printer not connected"
        );
        assert_eq!(
            PrinterError::UnknownInterface("COM1".into()).to_string(),
            "Unknown interface type"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = PrinterError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Operation timed out after 10000ms");
    }

    #[test]
    fn test_envelope_keeps_invalid_argument_code() {
        let err = PrinterError::invalid_argument("Port name is required");
        let envelope = ErrorEnvelope::from_error(ErrorCode::PrintError, &err);
        assert_eq!(envelope.code, ErrorCode::InvalidArgument);
        assert_eq!(envelope.message, "Port name is required");
    }

    #[test]
    fn test_envelope_uses_operation_code() {
        let port = PortId::new("BT:00:11:62:AA:BB:CC").unwrap();
        let envelope =
            ErrorEnvelope::from_error(ErrorCode::StatusError, &PrinterError::NotConnected(port));
        assert_eq!(envelope.code, ErrorCode::StatusError);
        assert_eq!(envelope.message, "Printer not connected");
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::DisconnectionError).unwrap();
        assert_eq!(json, "\"DISCONNECTION_ERROR\"");
        for code in [
            ErrorCode::InvalidArgument,
            ErrorCode::DiscoveryError,
            ErrorCode::ConnectionError,
            ErrorCode::PrintError,
            ErrorCode::StatusError,
        ] {
            assert_eq!(
                serde_json::to_value(code).unwrap(),
                serde_json::Value::String(code.as_str().to_string())
            );
        }
    }
}
