use serde_json::Value;

use domain::error::Result;
use domain::{PortId, PrinterError};

/// String argument that must be present; a value of another type counts
/// as missing.
pub(crate) fn required_str<'a>(arguments: &'a Value, key: &str, message: &str) -> Result<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| PrinterError::invalid_argument(message))
}

pub(crate) fn required_port(arguments: &Value) -> Result<PortId> {
    let name = required_str(arguments, "portName", "Port name is required")?;
    PortId::new(name)
}

pub(crate) fn required_emulation(arguments: &Value) -> Result<&str> {
    required_str(arguments, "emulation", "Emulation is required")
}

pub(crate) fn required_commands(arguments: &Value) -> Result<&Value> {
    arguments
        .get("printCommands")
        .filter(|commands| !commands.is_null())
        .ok_or_else(|| PrinterError::invalid_argument("Print commands are required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_port() {
        let port = required_port(&json!({"portName": "BT:mC-Print3"})).unwrap();
        assert_eq!(port.as_str(), "BT:mC-Print3");
    }

    #[test]
    fn test_missing_or_mistyped_port() {
        for args in [json!({}), json!({"portName": 7}), json!(null), json!("TCP:1")] {
            assert_eq!(
                required_port(&args).unwrap_err(),
                PrinterError::InvalidArgument("Port name is required".into())
            );
        }
    }

    #[test]
    fn test_empty_port_is_invalid() {
        assert!(required_port(&json!({"portName": ""})).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_required_commands() {
        assert!(required_commands(&json!({"printCommands": []})).is_ok());
        assert_eq!(
            required_commands(&json!({"printCommands": null})).unwrap_err(),
            PrinterError::InvalidArgument("Print commands are required".into())
        );
    }
}
