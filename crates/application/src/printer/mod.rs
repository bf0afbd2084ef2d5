pub mod compiler;
pub mod service;

pub use compiler::CommandCompiler;
pub use service::PrinterService;
