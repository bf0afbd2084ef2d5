use crate::error::{PrinterError, Result};
use serde::{Deserialize, Serialize};

use super::InterfaceType;

/// Value object identifying one physical printer
///
/// Rules:
/// - Must be non-empty
/// - Must not carry leading or trailing whitespace
///
/// The transport prefix (`TCP:`, `BT:`, `USB:`) is not checked here so that
/// an unknown prefix surfaces as `UnknownInterface` at connect time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortId(String);

impl PortId {
    /// Create a new PortId with validation
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.is_empty() {
            return Err(PrinterError::invalid_argument("Port name is required"));
        }

        if id.trim() != id {
            return Err(PrinterError::invalid_argument(format!(
                "Port name {id:?} must not contain surrounding whitespace"
            )));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Transport kind encoded in the identifier prefix
    pub fn interface_type(&self) -> Result<InterfaceType> {
        InterfaceType::detect(&self.0)
    }
}

impl TryFrom<String> for PortId {
    type Error = PrinterError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PortId> for String {
    fn from(value: PortId) -> Self {
        value.0
    }
}

impl std::fmt::Display for PortId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
