mod printer_session;
mod registry;
mod watcher;

pub use printer_session::PrinterSession;
pub use registry::{
    DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_OPERATION_TIMEOUT, RegistryOptions, SessionRegistry,
};
