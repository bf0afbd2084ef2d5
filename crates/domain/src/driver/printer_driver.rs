use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::SdkError;
use crate::port::{InterfaceFilter, InterfaceType, PortId, PrinterDescriptor};
use crate::status::StatusSnapshot;

/// What the SDK needs to address one printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub interface: InterfaceType,
    pub identifier: PortId,
}

/// Out-of-band notifications the SDK raises for an open printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Device status changed; the new state must be queried
    StatusChanged,
    /// Link to the device is gone and will not come back
    ConnectionLost(String),
}

/// Entry point of the vendor SDK: discovery and printer handles
#[async_trait]
pub trait PrinterSdk: Send + Sync {
    /// Scan the given interface class for printers
    async fn discover(&self, filter: InterfaceFilter) -> Result<Vec<PrinterDescriptor>, SdkError>;

    /// Create an unopened printer handle. `events` is the status observer
    /// the handle reports to for as long as it stays open.
    fn create_printer(
        &self,
        settings: ConnectionSettings,
        events: UnboundedSender<DeviceEvent>,
    ) -> Result<Box<dyn PrinterDriver>, SdkError>;
}

/// One printer handle. Not safe for overlapping operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PrinterDriver: Send + Sync {
    async fn open(&mut self) -> Result<(), SdkError>;

    async fn close(&mut self) -> Result<(), SdkError>;

    /// Send a command stream built by [`crate::document::CompiledDocument::to_commands`]
    async fn print(&mut self, commands: &str) -> Result<(), SdkError>;

    /// Query the device for its live status
    async fn status(&mut self) -> Result<StatusSnapshot, SdkError>;
}
