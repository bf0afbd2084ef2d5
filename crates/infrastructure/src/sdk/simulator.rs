use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use domain::driver::{ConnectionSettings, DeviceEvent, PrinterDriver, PrinterSdk};
use domain::error::Result as DomainResult;
use domain::{InterfaceFilter, PortId, PrinterDescriptor, SdkError, StatusSnapshot};

/// One simulated device as described in configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatedPrinterConfig {
    pub port_name: String,
    pub mac_address: Option<String>,
    pub model_name: Option<String>,
    pub usb_serial_number: Option<String>,
    #[serde(default = "default_online")]
    pub online: bool,
    #[serde(default)]
    pub cover_open: bool,
    #[serde(default)]
    pub cutter_error: bool,
    #[serde(default)]
    pub paper_empty: bool,
    #[serde(default)]
    pub over_temp: bool,
    pub print_latency_ms: Option<u64>,
}

fn default_online() -> bool {
    true
}

impl SimulatedPrinterConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            mac_address: None,
            model_name: None,
            usb_serial_number: None,
            online: true,
            cover_open: false,
            cutter_error: false,
            paper_empty: false,
            over_temp: false,
            print_latency_ms: None,
        }
    }

    fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            online: self.online,
            cover_open: self.cover_open,
            cutter_error: self.cutter_error,
            paper_empty: self.paper_empty,
            over_temp: self.over_temp,
        }
    }
}

#[derive(Default)]
struct Faults {
    open: Option<String>,
    close: Option<String>,
    print: Option<String>,
    status: Option<String>,
}

struct DeviceState {
    descriptor: PrinterDescriptor,
    snapshot: StatusSnapshot,
    latency: Duration,
    faults: Faults,
    opened: bool,
    observer: Option<UnboundedSender<DeviceEvent>>,
    printed: Vec<String>,
}

/// Handle on an in-memory device. Clones share the same device.
#[derive(Clone)]
pub struct SimulatedPrinter {
    state: Arc<Mutex<DeviceState>>,
}

impl SimulatedPrinter {
    pub fn new(descriptor: PrinterDescriptor) -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState {
                descriptor,
                snapshot: StatusSnapshot::healthy(),
                latency: Duration::ZERO,
                faults: Faults::default(),
                opened: false,
                observer: None,
                printed: Vec::new(),
            })),
        }
    }

    pub fn from_config(config: &SimulatedPrinterConfig) -> DomainResult<Self> {
        let mut descriptor = PrinterDescriptor::new(PortId::new(config.port_name.as_str())?);
        descriptor.mac_address = config.mac_address.clone();
        descriptor.model_name = config.model_name.clone();
        descriptor.usb_serial_number = config.usb_serial_number.clone();

        let printer = Self::new(descriptor);
        {
            let mut state = printer.lock();
            state.snapshot = config.snapshot();
            state.latency = Duration::from_millis(config.print_latency_ms.unwrap_or(0));
        }
        Ok(printer)
    }

    // A poisoned lock only means a test panicked mid-update; the state is
    // still plain data.
    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn port(&self) -> PortId {
        self.lock().descriptor.port_name.clone()
    }

    pub fn descriptor(&self) -> PrinterDescriptor {
        self.lock().descriptor.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().opened
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.lock().snapshot
    }

    /// Replaces the device flags and notifies the open handle, if any
    pub fn set_status(&self, snapshot: StatusSnapshot) {
        let mut state = self.lock();
        state.snapshot = snapshot;
        if let Some(observer) = &state.observer {
            let _ = observer.send(DeviceEvent::StatusChanged);
        }
    }

    /// Simulates a lost link. The open handle is told once and then
    /// forgotten.
    pub fn drop_connection(&self, reason: impl Into<String>) {
        let mut state = self.lock();
        state.opened = false;
        if let Some(observer) = state.observer.take() {
            let _ = observer.send(DeviceEvent::ConnectionLost(reason.into()));
        }
    }

    pub fn set_print_latency(&self, latency: Duration) {
        self.lock().latency = latency;
    }

    pub fn fail_next_open(&self, message: impl Into<String>) {
        self.lock().faults.open = Some(message.into());
    }

    pub fn fail_next_close(&self, message: impl Into<String>) {
        self.lock().faults.close = Some(message.into());
    }

    pub fn fail_next_print(&self, message: impl Into<String>) {
        self.lock().faults.print = Some(message.into());
    }

    pub fn fail_next_status(&self, message: impl Into<String>) {
        self.lock().faults.status = Some(message.into());
    }

    /// Command streams received by `print`, oldest first
    pub fn printed_commands(&self) -> Vec<String> {
        self.lock().printed.clone()
    }
}

/// Vendor SDK stand-in backed by [`SimulatedPrinter`]s
#[derive(Default)]
pub struct SimulatedSdk {
    printers: Mutex<Vec<SimulatedPrinter>>,
    discovery_fault: Mutex<Option<String>>,
}

impl SimulatedSdk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &[SimulatedPrinterConfig]) -> DomainResult<Self> {
        let sdk = Self::new();
        for config in configs {
            sdk.add(SimulatedPrinter::from_config(config)?);
        }
        Ok(sdk)
    }

    pub fn add(&self, printer: SimulatedPrinter) -> SimulatedPrinter {
        debug!(port = %printer.port(), "Simulated printer added");
        self.printers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(printer.clone());
        printer
    }

    /// Adds a healthy device with no extra descriptor fields
    pub fn add_printer(&self, port_name: &str) -> DomainResult<SimulatedPrinter> {
        let printer = SimulatedPrinter::from_config(&SimulatedPrinterConfig::new(port_name))?;
        Ok(self.add(printer))
    }

    pub fn printer(&self, port: &PortId) -> Option<SimulatedPrinter> {
        self.printers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|printer| &printer.port() == port)
            .cloned()
    }

    pub fn fail_next_discovery(&self, message: impl Into<String>) {
        *self
            .discovery_fault
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(message.into());
    }
}

#[async_trait]
impl PrinterSdk for SimulatedSdk {
    async fn discover(&self, filter: InterfaceFilter) -> Result<Vec<PrinterDescriptor>, SdkError> {
        let fault = self
            .discovery_fault
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(message) = fault {
            return Err(SdkError::new(message));
        }

        let printers = self
            .printers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let found: Vec<PrinterDescriptor> = printers
            .iter()
            .map(SimulatedPrinter::descriptor)
            .filter(|descriptor| {
                descriptor
                    .port_name
                    .interface_type()
                    .is_ok_and(|interface| filter.matches(interface))
            })
            .collect();
        debug!(filter = ?filter, found = found.len(), "Simulated discovery finished");
        Ok(found)
    }

    fn create_printer(
        &self,
        settings: ConnectionSettings,
        events: UnboundedSender<DeviceEvent>,
    ) -> Result<Box<dyn PrinterDriver>, SdkError> {
        let device = self.printer(&settings.identifier);
        Ok(Box::new(SimulatedDriver {
            port: settings.identifier,
            device,
            events,
        }))
    }
}

struct SimulatedDriver {
    port: PortId,
    device: Option<SimulatedPrinter>,
    events: UnboundedSender<DeviceEvent>,
}

impl SimulatedDriver {
    fn device(&self) -> Result<&SimulatedPrinter, SdkError> {
        self.device
            .as_ref()
            .ok_or_else(|| SdkError::new(format!("Printer not found: {}", self.port)))
    }
}

#[async_trait]
impl PrinterDriver for SimulatedDriver {
    async fn open(&mut self) -> Result<(), SdkError> {
        let device = self.device()?;
        let mut state = device.lock();
        if let Some(message) = state.faults.open.take() {
            warn!(port = %self.port, error = %message, "Simulated open failure");
            return Err(SdkError::new(message));
        }
        if state.opened {
            return Err(SdkError::new("Printer is in use"));
        }
        state.opened = true;
        state.observer = Some(self.events.clone());
        info!(port = %self.port, "Simulated printer opened");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SdkError> {
        let device = self.device()?;
        let mut state = device.lock();
        state.opened = false;
        state.observer = None;
        if let Some(message) = state.faults.close.take() {
            return Err(SdkError::new(message));
        }
        info!(port = %self.port, "Simulated printer closed");
        Ok(())
    }

    async fn print(&mut self, commands: &str) -> Result<(), SdkError> {
        let latency = self.device()?.lock().latency;
        if !latency.is_zero() {
            sleep(latency).await;
        }

        let mut state = self.device()?.lock();
        if let Some(message) = state.faults.print.take() {
            return Err(SdkError::new(message));
        }
        if !state.opened {
            return Err(SdkError::new("Printer is not open"));
        }
        state.printed.push(commands.to_string());
        debug!(port = %self.port, bytes = commands.len(), "Simulated print done");
        Ok(())
    }

    async fn status(&mut self) -> Result<StatusSnapshot, SdkError> {
        let mut state = self.device()?.lock();
        if let Some(message) = state.faults.status.take() {
            return Err(SdkError::new(message));
        }
        if !state.opened {
            return Err(SdkError::new("Printer is not open"));
        }
        Ok(state.snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CompiledDocument, PrinterTarget};
    use tokio::sync::mpsc;

    fn settings(port: &str) -> ConnectionSettings {
        let identifier = PortId::new(port).unwrap();
        ConnectionSettings {
            interface: identifier.interface_type().unwrap(),
            identifier,
        }
    }

    #[tokio::test]
    async fn test_discovery_filters_by_interface() {
        let sdk = SimulatedSdk::new();
        sdk.add_printer("TCP:192.168.1.20").unwrap();
        sdk.add_printer("BT:00:11:62:AA:BB:CC").unwrap();
        sdk.add_printer("USB:TSP100").unwrap();

        let all = sdk.discover(InterfaceFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);

        let lan = sdk.discover(InterfaceFilter::Lan).await.unwrap();
        assert_eq!(lan.len(), 1);
        assert_eq!(lan[0].port_name.as_str(), "TCP:192.168.1.20");
    }

    #[tokio::test]
    async fn test_discovery_fault_is_one_shot() {
        let sdk = SimulatedSdk::new();
        sdk.fail_next_discovery("Bluetooth is disabled");
        let err = sdk.discover(InterfaceFilter::All).await.unwrap_err();
        assert_eq!(err.to_string(), "Bluetooth is disabled");
        assert!(sdk.discover(InterfaceFilter::All).await.is_ok());
    }

    #[tokio::test]
    async fn test_open_print_and_status() {
        let sdk = SimulatedSdk::new();
        let printer = sdk.add_printer("TCP:10.0.0.5").unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut driver = sdk.create_printer(settings("TCP:10.0.0.5"), tx).unwrap();

        driver.open().await.unwrap();
        assert!(printer.is_open());

        let commands = CompiledDocument::new(PrinterTarget::new()).to_commands();
        driver.print(&commands).await.unwrap();
        assert_eq!(printer.printed_commands(), vec![commands]);
        assert!(driver.status().await.unwrap().online);

        driver.close().await.unwrap();
        assert!(!printer.is_open());
    }

    #[tokio::test]
    async fn test_unknown_device_fails_on_open() {
        let sdk = SimulatedSdk::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut driver = sdk.create_printer(settings("TCP:10.9.9.9"), tx).unwrap();
        let err = driver.open().await.unwrap_err();
        assert_eq!(err.to_string(), "Printer not found: TCP:10.9.9.9");
    }

    #[tokio::test]
    async fn test_observer_receives_device_events() {
        let sdk = SimulatedSdk::new();
        let printer = sdk.add_printer("BT:mC-Print3").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = sdk.create_printer(settings("BT:mC-Print3"), tx).unwrap();
        driver.open().await.unwrap();

        printer.set_status(StatusSnapshot {
            cover_open: true,
            ..StatusSnapshot::healthy()
        });
        assert_eq!(rx.recv().await, Some(DeviceEvent::StatusChanged));

        printer.drop_connection("Link lost");
        assert_eq!(
            rx.recv().await,
            Some(DeviceEvent::ConnectionLost("Link lost".into()))
        );
        assert!(driver.status().await.is_err());
    }

    #[test]
    fn test_config_defaults_to_online() {
        let config: SimulatedPrinterConfig =
            serde_json::from_value(serde_json::json!({"port_name": "USB:TSP100", "paper_empty": true}))
                .unwrap();
        let printer = SimulatedPrinter::from_config(&config).unwrap();
        let snapshot = printer.snapshot();
        assert!(snapshot.online);
        assert!(snapshot.paper_empty);
    }
}
