use serde::{Deserialize, Serialize};

use super::PortId;

/// A printer found during discovery.
///
/// Fields the device does not report stay `None` and are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDescriptor {
    #[serde(rename = "portName")]
    pub port_name: PortId,
    #[serde(rename = "macAddress", default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(rename = "modelName", default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(rename = "USBSerialNumber", default, skip_serializing_if = "Option::is_none")]
    pub usb_serial_number: Option<String>,
}

impl PrinterDescriptor {
    pub fn new(port_name: PortId) -> Self {
        Self {
            port_name,
            mac_address: None,
            model_name: None,
            usb_serial_number: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let mut descriptor = PrinterDescriptor::new(PortId::new("TCP:10.0.0.9").unwrap());
        descriptor.model_name = Some("TSP100IV".to_string());

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            json!({"portName": "TCP:10.0.0.9", "modelName": "TSP100IV"})
        );
    }

    #[test]
    fn test_full_descriptor_keys() {
        let descriptor = PrinterDescriptor {
            port_name: PortId::new("USB:SN-1").unwrap(),
            mac_address: Some("00:11:62:AA:BB:CC".to_string()),
            model_name: Some("mC-Print3".to_string()),
            usb_serial_number: Some("SN-1".to_string()),
        };

        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["portName"], "USB:SN-1");
        assert_eq!(value["macAddress"], "00:11:62:AA:BB:CC");
        assert_eq!(value["modelName"], "mC-Print3");
        assert_eq!(value["USBSerialNumber"], "SN-1");
    }
}
