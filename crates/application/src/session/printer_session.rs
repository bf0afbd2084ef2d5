use std::future::Future;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use domain::driver::{ConnectionState, PrinterDriver};
use domain::error::Result;
use domain::{CompiledDocument, InterfaceType, PortId, PrinterError, SdkError, StatusSnapshot};

/// Runs one SDK call under `limit`, mapping elapsed time to `Timeout`.
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    work: impl Future<Output = std::result::Result<T, SdkError>>,
) -> Result<T> {
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result.map_err(PrinterError::from),
        Err(_) => Err(PrinterError::Timeout(limit)),
    }
}

/// An open connection to one printer.
///
/// Device operations are queued on the driver lock so only one runs at a
/// time. Closing the session cancels queued and in-flight operations, which
/// then fail with `SessionClosed`.
pub struct PrinterSession {
    port: PortId,
    interface: InterfaceType,
    emulation: String,
    driver: Mutex<Box<dyn PrinterDriver>>,
    state: StdMutex<ConnectionState>,
    closing: AtomicBool,
    cancel: CancellationToken,
    timeout: Duration,
}

impl PrinterSession {
    /// Wraps an unopened driver; the session starts `Disconnected`
    pub(crate) fn new(
        port: PortId,
        interface: InterfaceType,
        emulation: String,
        driver: Box<dyn PrinterDriver>,
        timeout: Duration,
    ) -> Self {
        Self {
            port,
            interface,
            emulation,
            driver: Mutex::new(driver),
            state: StdMutex::new(ConnectionState::Disconnected),
            closing: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            timeout,
        }
    }

    /// Opens the driver, moving the session through `Connecting` to
    /// `Connected`. A failed open leaves it `Disconnected`.
    pub(crate) async fn open(&self) -> Result<()> {
        self.transition(|state| {
            state
                .to_connecting()
                .map_err(|_| PrinterError::AlreadyConnected(self.port.clone()))
        })?;
        debug!(port = %self.port, interface = self.interface.as_str(), "Opening printer connection");

        let opened = {
            let mut driver = self.acquire().await?;
            self.guard(driver.open()).await
        };
        if let Err(e) = opened {
            self.transition(|state| Ok(state.to_disconnected()))?;
            return Err(e);
        }

        self.transition(|state| state.to_connected().map_err(|_| self.closed_error()))?;
        info!(port = %self.port, emulation = %self.emulation, "Printer connected");
        Ok(())
    }

    pub fn port(&self) -> &PortId {
        &self.port
    }

    pub fn interface(&self) -> InterfaceType {
        self.interface
    }

    pub fn emulation(&self) -> &str {
        &self.emulation
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// True once `close` has started
    pub fn is_closed(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Resolves when the session starts closing
    pub async fn closed(&self) {
        self.cancel.cancelled().await
    }

    /// Prints the document, then reads back the device status
    pub async fn print(&self, document: &CompiledDocument) -> Result<StatusSnapshot> {
        let commands = document.to_commands();
        let mut driver = self.acquire().await?;
        let work = async {
            driver.print(&commands).await?;
            let snapshot = driver.status().await?;
            Ok::<_, SdkError>(snapshot)
        };
        self.guard(work).await
    }

    pub async fn status(&self) -> Result<StatusSnapshot> {
        let mut driver = self.acquire().await?;
        self.guard(driver.status()).await
    }

    /// Cancels pending work and closes the driver.
    ///
    /// The session ends up `Disconnected` whether or not the driver closed
    /// cleanly. A second call fails with `NotConnected`.
    pub async fn close(&self) -> Result<()> {
        if self.closing.swap(true, Ordering::SeqCst) {
            return Err(PrinterError::NotConnected(self.port.clone()));
        }
        self.cancel.cancel();

        let mut driver = self.driver.lock().await;
        let result = with_timeout(self.timeout, driver.close()).await;
        drop(driver);

        self.transition(|state| Ok(state.to_disconnected()))?;
        debug!(port = %self.port, ok = result.is_ok(), "Printer connection closed");
        result
    }

    fn transition(
        &self,
        step: impl FnOnce(ConnectionState) -> Result<ConnectionState>,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = step(*state)?;
        Ok(())
    }

    async fn acquire(&self) -> Result<MutexGuard<'_, Box<dyn PrinterDriver>>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(self.closed_error()),
            driver = self.driver.lock() => Ok(driver),
        }
    }

    async fn guard<T>(
        &self,
        work: impl Future<Output = std::result::Result<T, SdkError>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(self.closed_error()),
            result = with_timeout(self.timeout, work) => result,
        }
    }

    fn closed_error(&self) -> PrinterError {
        PrinterError::SessionClosed(self.port.clone())
    }
}

impl std::fmt::Debug for PrinterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterSession")
            .field("port", &self.port)
            .field("interface", &self.interface)
            .field("emulation", &self.emulation)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
