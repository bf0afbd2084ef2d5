mod connection_state;
mod image_loader;
mod printer_driver;

pub use connection_state::ConnectionState;
pub use image_loader::ImageLoader;
pub use printer_driver::{ConnectionSettings, DeviceEvent, PrinterDriver, PrinterSdk};
