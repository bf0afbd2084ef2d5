use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use domain::driver::{ConnectionSettings, ConnectionState, PrinterSdk};
use domain::error::Result;
use domain::{InterfaceFilter, PortId, PrinterDescriptor, PrinterError};

use super::printer_session::{PrinterSession, with_timeout};
use super::watcher::SessionWatcher;
use crate::status::StatusHub;

/// Default bound on a single device operation
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on one discovery scan
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    pub operation_timeout: Duration,
    pub discovery_timeout: Duration,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }
}

pub(crate) enum Slot {
    Connecting,
    Connected(Arc<PrinterSession>),
}

impl Slot {
    pub(crate) fn holds(&self, session: &Arc<PrinterSession>) -> bool {
        matches!(self, Self::Connected(current) if Arc::ptr_eq(current, session))
    }
}

pub(crate) type SlotMap = Arc<DashMap<PortId, Slot>>;

/// Keeps a `Connecting` slot reserved until the connect either commits a
/// session or is abandoned, in which case the slot is released.
struct Reservation<'a> {
    slots: &'a DashMap<PortId, Slot>,
    port: PortId,
    committed: bool,
}

impl<'a> Reservation<'a> {
    fn claim(slots: &'a DashMap<PortId, Slot>, port: &PortId) -> Result<Self> {
        match slots.entry(port.clone()) {
            Entry::Occupied(_) => Err(PrinterError::AlreadyConnected(port.clone())),
            Entry::Vacant(entry) => {
                entry.insert(Slot::Connecting);
                Ok(Self {
                    slots,
                    port: port.clone(),
                    committed: false,
                })
            }
        }
    }

    fn commit(mut self, session: Arc<PrinterSession>) {
        self.slots
            .insert(self.port.clone(), Slot::Connected(session));
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.slots
                .remove_if(&self.port, |_, slot| matches!(slot, Slot::Connecting));
        }
    }
}

/// Tracks at most one open session per port identifier
pub struct SessionRegistry {
    sdk: Arc<dyn PrinterSdk>,
    hub: Arc<StatusHub>,
    slots: SlotMap,
    options: RegistryOptions,
}

impl SessionRegistry {
    pub fn new(sdk: Arc<dyn PrinterSdk>, hub: Arc<StatusHub>, options: RegistryOptions) -> Self {
        Self {
            sdk,
            hub,
            slots: Arc::new(DashMap::new()),
            options,
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    pub fn hub(&self) -> &Arc<StatusHub> {
        &self.hub
    }

    pub async fn discover(&self, filter: InterfaceFilter) -> Result<Vec<PrinterDescriptor>> {
        let printers = with_timeout(self.options.discovery_timeout, self.sdk.discover(filter)).await?;
        info!(filter = ?filter, found = printers.len(), "Discovery finished");
        Ok(printers)
    }

    /// Opens a session for `port`.
    ///
    /// Fails with `AlreadyConnected` if the port has a session or a connect
    /// in progress. On any failure the port is left without a slot.
    pub async fn connect(
        &self,
        port: PortId,
        emulation: impl Into<String>,
    ) -> Result<Arc<PrinterSession>> {
        let reservation = Reservation::claim(&self.slots, &port)?;
        let interface = port.interface_type()?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let settings = ConnectionSettings {
            interface,
            identifier: port.clone(),
        };
        let driver = self.sdk.create_printer(settings, events_tx)?;

        let session = Arc::new(PrinterSession::new(
            port.clone(),
            interface,
            emulation.into(),
            driver,
            self.options.operation_timeout,
        ));
        if let Err(e) = session.open().await {
            error!(port = %port, error = %e, "Failed to open printer");
            return Err(e);
        }

        reservation.commit(session.clone());

        let watcher = SessionWatcher::new(
            session.clone(),
            events_rx,
            self.hub.clone(),
            self.slots.clone(),
        );
        tokio::spawn(watcher.run());

        Ok(session)
    }

    /// Closes and forgets the session for `port`.
    ///
    /// The entry is removed once the close has been attempted, even when
    /// the driver reports a failure.
    pub async fn disconnect(&self, port: &PortId) -> Result<()> {
        let session = self.lookup(port)?;
        let result = session.close().await;
        self.slots.remove_if(port, |_, slot| slot.holds(&session));

        match &result {
            Ok(()) => info!(port = %port, "Printer disconnected"),
            Err(e) => warn!(port = %port, error = %e, "Printer disconnected with error"),
        }
        result
    }

    /// Live session for `port`, or `NotConnected`
    pub fn lookup(&self, port: &PortId) -> Result<Arc<PrinterSession>> {
        let session = match self.slots.get(port).as_deref() {
            Some(Slot::Connected(session)) => Some(session.clone()),
            _ => None,
        };

        session
            .filter(|session| !session.is_closed())
            .ok_or_else(|| PrinterError::NotConnected(port.clone()))
    }

    pub fn connection_state(&self, port: &PortId) -> ConnectionState {
        match self.slots.get(port).as_deref() {
            Some(Slot::Connecting) => ConnectionState::Connecting,
            Some(Slot::Connected(session)) => session.state(),
            None => ConnectionState::Disconnected,
        }
    }

    /// Ports with an open session, sorted
    pub fn connected_ports(&self) -> Vec<PortId> {
        let mut ports: Vec<PortId> = self
            .slots
            .iter()
            .filter_map(|entry| match entry.value() {
                Slot::Connected(session)
                    if !session.is_closed() && session.state().is_connected() =>
                {
                    Some(entry.key().clone())
                }
                _ => None,
            })
            .collect();
        ports.sort();
        ports
    }

    /// Disconnects every open session, logging failures
    pub async fn disconnect_all(&self) {
        for port in self.connected_ports() {
            if let Err(e) = self.disconnect(&port).await {
                warn!(port = %port, error = %e, "Failed to disconnect during shutdown");
            }
        }
    }
}
