mod descriptor;
mod interface;
mod port_id;

pub use descriptor::PrinterDescriptor;
pub use interface::{InterfaceFilter, InterfaceType};
pub use port_id::PortId;
