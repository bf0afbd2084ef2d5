use crate::error::{PrinterError, Result};
use serde::{Deserialize, Serialize};

/// Transport kind of a physical printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceType {
    Lan,
    Bluetooth,
    Usb,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lan => "LAN",
            Self::Bluetooth => "BLUETOOTH",
            Self::Usb => "USB",
        }
    }

    /// Port identifier prefix that selects this transport
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Lan => "TCP:",
            Self::Bluetooth => "BT:",
            Self::Usb => "USB:",
        }
    }

    /// Infers the transport from a port identifier prefix.
    pub fn detect(port_name: &str) -> Result<Self> {
        [Self::Lan, Self::Bluetooth, Self::Usb]
            .into_iter()
            .find(|kind| port_name.starts_with(kind.prefix()))
            .ok_or_else(|| PrinterError::UnknownInterface(port_name.to_string()))
    }
}

/// Discovery scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceFilter {
    All,
    Lan,
    Bluetooth,
    Usb,
}

impl InterfaceFilter {
    /// Parses `ALL`, `LAN`, `BLUETOOTH` or `USB`, ignoring case.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "LAN" => Ok(Self::Lan),
            "BLUETOOTH" => Ok(Self::Bluetooth),
            "USB" => Ok(Self::Usb),
            _ => Err(PrinterError::UnsupportedInterface(value.to_string())),
        }
    }

    pub fn matches(&self, interface: InterfaceType) -> bool {
        match self {
            Self::All => true,
            Self::Lan => interface == InterfaceType::Lan,
            Self::Bluetooth => interface == InterfaceType::Bluetooth,
            Self::Usb => interface == InterfaceType::Usb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_prefix() {
        assert_eq!(
            InterfaceType::detect("TCP:10.0.0.7").unwrap(),
            InterfaceType::Lan
        );
        assert_eq!(
            InterfaceType::detect("BT:00:11:62:12:34:56").unwrap(),
            InterfaceType::Bluetooth
        );
        assert_eq!(
            InterfaceType::detect("USB:2581-1234").unwrap(),
            InterfaceType::Usb
        );
    }

    #[test]
    fn test_detect_unknown_prefix() {
        for name in ["", "tcp:10.0.0.7", "BLE:AA", "COM1", "TCP"] {
            assert_eq!(
                InterfaceType::detect(name),
                Err(PrinterError::UnknownInterface(name.to_string()))
            );
        }
    }

    #[test]
    fn test_filter_parse_ignores_case() {
        assert_eq!(InterfaceFilter::parse("all").unwrap(), InterfaceFilter::All);
        assert_eq!(InterfaceFilter::parse("Lan").unwrap(), InterfaceFilter::Lan);
        assert_eq!(
            InterfaceFilter::parse("BLUETOOTH").unwrap(),
            InterfaceFilter::Bluetooth
        );
        assert_eq!(InterfaceFilter::parse("usb").unwrap(), InterfaceFilter::Usb);
    }

    #[test]
    fn test_filter_parse_rejects_unknown() {
        assert_eq!(
            InterfaceFilter::parse("SERIAL"),
            Err(PrinterError::UnsupportedInterface("SERIAL".to_string()))
        );
    }

    #[test]
    fn test_filter_matches() {
        assert!(InterfaceFilter::All.matches(InterfaceType::Usb));
        assert!(InterfaceFilter::Lan.matches(InterfaceType::Lan));
        assert!(!InterfaceFilter::Lan.matches(InterfaceType::Bluetooth));
        assert!(!InterfaceFilter::Usb.matches(InterfaceType::Lan));
    }
}
