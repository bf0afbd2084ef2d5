use serde::{Deserialize, Serialize};
use serde_json::Value;

use domain::{ErrorCode, ErrorEnvelope};

/// Operations exposed on the method channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    PortDiscovery,
    Connect,
    Disconnect,
    Print,
    CheckStatus,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "portDiscovery" => Some(Self::PortDiscovery),
            "connect" => Some(Self::Connect),
            "disconnect" => Some(Self::Disconnect),
            "print" => Some(Self::Print),
            "checkStatus" => Some(Self::CheckStatus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PortDiscovery => "portDiscovery",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Print => "print",
            Self::CheckStatus => "checkStatus",
        }
    }

    /// Code reported for any non-argument failure of this method
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::PortDiscovery => ErrorCode::DiscoveryError,
            Self::Connect => ErrorCode::ConnectionError,
            Self::Disconnect => ErrorCode::DisconnectionError,
            Self::Print => ErrorCode::PrintError,
            Self::CheckStatus => ErrorCode::StatusError,
        }
    }
}

/// One request as received from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Outcome of one request
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error(ErrorEnvelope),
    NotImplemented,
}

impl MethodResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Error(envelope) => Some(envelope),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_round_trip() {
        for method in [
            Method::PortDiscovery,
            Method::Connect,
            Method::Disconnect,
            Method::Print,
            Method::CheckStatus,
        ] {
            assert_eq!(Method::from_name(method.as_str()), Some(method));
        }
        assert_eq!(Method::from_name("openDrawer"), None);
        assert_eq!(Method::from_name("Connect"), None);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Method::PortDiscovery.error_code(), ErrorCode::DiscoveryError);
        assert_eq!(Method::Connect.error_code(), ErrorCode::ConnectionError);
        assert_eq!(Method::Disconnect.error_code(), ErrorCode::DisconnectionError);
        assert_eq!(Method::Print.error_code(), ErrorCode::PrintError);
        assert_eq!(Method::CheckStatus.error_code(), ErrorCode::StatusError);
    }

    #[test]
    fn test_call_without_arguments() {
        let call: MethodCall = serde_json::from_str(r#"{"method": "checkStatus"}"#).unwrap();
        assert_eq!(call.method, "checkStatus");
        assert!(call.arguments.is_null());
    }
}
