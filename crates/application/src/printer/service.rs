use std::sync::Arc;
use tracing::info;

use domain::error::Result;
use domain::{InterfaceFilter, PortId, PrintInstruction, PrinterDescriptor, StatusReport};

use super::compiler::CommandCompiler;
use crate::session::SessionRegistry;
use crate::status::normalize;

/// Discovery, connection and printing use cases over the session registry
pub struct PrinterService {
    registry: Arc<SessionRegistry>,
    compiler: CommandCompiler,
}

impl PrinterService {
    pub fn new(registry: Arc<SessionRegistry>, compiler: CommandCompiler) -> Self {
        Self { registry, compiler }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// `interface` is one of ALL, LAN, BLUETOOTH, USB in any case
    pub async fn discover(&self, interface: &str) -> Result<Vec<PrinterDescriptor>> {
        let filter = InterfaceFilter::parse(interface)?;
        self.registry.discover(filter).await
    }

    pub async fn connect(&self, port: &PortId, emulation: &str) -> Result<()> {
        self.registry.connect(port.clone(), emulation).await?;
        Ok(())
    }

    pub async fn disconnect(&self, port: &PortId) -> Result<()> {
        self.registry.disconnect(port).await
    }

    /// Compiles and prints the instructions, returning the status read
    /// back right after the job.
    pub async fn print(
        &self,
        port: &PortId,
        instructions: &[PrintInstruction],
    ) -> Result<StatusReport> {
        let session = self.registry.lookup(port)?;
        let document = self.compiler.compile(instructions).await?;

        info!(
            port = %port,
            instructions = instructions.len(),
            commands = document.printer().len(),
            "Sending print job"
        );
        let snapshot = session.print(&document).await?;
        Ok(normalize(&snapshot))
    }

    pub async fn check_status(&self, port: &PortId) -> Result<StatusReport> {
        let session = self.registry.lookup(port)?;
        let snapshot = session.status().await?;
        Ok(normalize(&snapshot))
    }
}
