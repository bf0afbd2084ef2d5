//! Infrastructure layer - SDK adapters, image loading, status delivery
//! and configuration

pub mod config;
pub mod image_loader;
pub mod messaging;
pub mod sdk;

pub use config::BridgeConfig;
pub use image_loader::FsImageLoader;
pub use messaging::ChannelStatusSink;
pub use sdk::{SimulatedPrinter, SimulatedPrinterConfig, SimulatedSdk};
