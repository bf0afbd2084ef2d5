pub mod simulator;

pub use simulator::{SimulatedPrinter, SimulatedPrinterConfig, SimulatedSdk};
