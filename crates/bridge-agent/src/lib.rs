//! Newline-delimited JSON method channel in front of the printer bridge

pub mod server;
pub mod wire;

pub use server::BridgeServer;
