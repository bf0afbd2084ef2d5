//! Domain layer - Printer bridge types and ports with no I/O
//!
//! This crate contains:
//! - Value objects (PortId, InterfaceType, Charset, CutType, Alignment)
//! - Print instructions and the compiled document model
//! - Status snapshots and normalized reports
//! - The session connection state machine
//! - Port traits for the vendor SDK, image loading and status sinks
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Invalid values rejected at construction
//! - Testable in isolation

pub mod document;
pub mod driver;
pub mod error;
pub mod event;
pub mod instruction;
pub mod port;
pub mod status;

// Re-export commonly used types
pub use document::{CompiledDocument, PrinterCommand, PrinterTarget};
pub use error::{ErrorCode, ErrorEnvelope, PrinterError, SdkError};
pub use event::{StatusEvent, StatusPayload};
pub use instruction::PrintInstruction;
pub use port::{InterfaceFilter, InterfaceType, PortId, PrinterDescriptor};
pub use status::{StatusReport, StatusSnapshot};
