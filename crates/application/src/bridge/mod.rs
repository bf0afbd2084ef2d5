//! Method-channel surface: turns host requests into use-case calls and
//! coded responses.

mod arguments;
pub mod method;

pub use method::{Method, MethodCall, MethodResponse};

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use domain::instruction::decode_instructions;
use domain::error::Result;
use domain::event::StatusSink;
use domain::ErrorEnvelope;

use crate::printer::PrinterService;
use crate::status::SubscriptionHandle;

pub struct PrinterBridge {
    service: Arc<PrinterService>,
    listener: Mutex<Option<SubscriptionHandle>>,
}

impl PrinterBridge {
    pub fn new(service: Arc<PrinterService>) -> Self {
        Self {
            service,
            listener: Mutex::new(None),
        }
    }

    pub fn service(&self) -> &Arc<PrinterService> {
        &self.service
    }

    /// Serves one request. Unknown methods answer `NotImplemented`.
    pub async fn handle(&self, call: &MethodCall) -> MethodResponse {
        let Some(method) = Method::from_name(&call.method) else {
            warn!(method = %call.method, "Unhandled method");
            return MethodResponse::NotImplemented;
        };

        debug!(method = method.as_str(), "Handling method call");
        let outcome = match method {
            Method::PortDiscovery => self.port_discovery(&call.arguments).await,
            Method::Connect => self.connect(&call.arguments).await,
            Method::Disconnect => self.disconnect(&call.arguments).await,
            Method::Print => self.print(&call.arguments).await,
            Method::CheckStatus => self.check_status(&call.arguments).await,
        };

        match outcome {
            Ok(value) => MethodResponse::Success(value),
            Err(e) => {
                let envelope = ErrorEnvelope::from_error(method.error_code(), &e);
                warn!(
                    method = method.as_str(),
                    code = %envelope.code,
                    error = %envelope.message,
                    "Method call failed"
                );
                MethodResponse::Error(envelope)
            }
        }
    }

    /// Serves the request on its own task so a slow printer never holds
    /// up calls for other ports.
    pub fn spawn(self: &Arc<Self>, call: MethodCall) -> JoinHandle<MethodResponse> {
        let bridge = Arc::clone(self);
        tokio::spawn(async move { bridge.handle(&call).await })
    }

    /// Routes every status event to `sink`, replacing any earlier listener
    pub async fn listen(&self, sink: Arc<dyn StatusSink>) -> SubscriptionHandle {
        let hub = self.service.registry().hub();
        let mut listener = self.listener.lock().await;
        if let Some(previous) = listener.take() {
            hub.unsubscribe(previous).await;
        }
        let handle = hub.subscribe(None, sink).await;
        info!(subscription = %handle, "Status listener attached");
        *listener = Some(handle);
        handle
    }

    /// Returns false when no listener was attached
    pub async fn cancel(&self) -> bool {
        let Some(handle) = self.listener.lock().await.take() else {
            return false;
        };
        info!(subscription = %handle, "Status listener detached");
        self.service.registry().hub().unsubscribe(handle).await
    }

    async fn port_discovery(&self, args: &Value) -> Result<Value> {
        let interface = arguments::required_str(args, "type", "Type is required")?;
        let printers = self.service.discover(interface).await?;
        info!(interface, found = printers.len(), "Discovery finished");
        Ok(to_json(printers))
    }

    async fn connect(&self, args: &Value) -> Result<Value> {
        let port = arguments::required_port(args)?;
        let emulation = arguments::required_emulation(args)?;
        self.service.connect(&port, emulation).await?;
        Ok(Value::Null)
    }

    async fn disconnect(&self, args: &Value) -> Result<Value> {
        let port = arguments::required_port(args)?;
        self.service.disconnect(&port).await?;
        Ok(Value::Null)
    }

    async fn print(&self, args: &Value) -> Result<Value> {
        let port = arguments::required_port(args)?;
        arguments::required_emulation(args)?;
        let commands = arguments::required_commands(args)?;
        let instructions = decode_instructions(commands)?;
        let report = self.service.print(&port, &instructions).await?;
        Ok(to_json(report))
    }

    async fn check_status(&self, args: &Value) -> Result<Value> {
        let port = arguments::required_port(args)?;
        let report = self.service.check_status(&port).await?;
        Ok(to_json(report))
    }
}

// Result payloads are plain data whose serialization cannot fail.
fn to_json<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
