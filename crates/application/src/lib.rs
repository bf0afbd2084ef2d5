//! Application layer - Printer sessions, command compilation and the
//! method-channel bridge

pub mod bridge;
pub mod printer;
pub mod session;
pub mod status;

pub use bridge::{Method, MethodCall, MethodResponse, PrinterBridge};
pub use printer::{CommandCompiler, PrinterService};
pub use session::{PrinterSession, RegistryOptions, SessionRegistry};
pub use status::{StatusHub, SubscriptionHandle, normalize};
