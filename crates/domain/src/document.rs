use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Serialize, Serializer};
use serde_json::json;

use crate::instruction::{Alignment, Charset, CutType, DrawerChannel};

/// One device-level directive inside a printer target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PrinterCommand {
    TextEncoding { charset: Charset },
    Cut { cut: CutType },
    OpenDrawer { channel: DrawerChannel },
    Image(ImageCommand),
    Text { content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCommand {
    #[serde(serialize_with = "as_base64")]
    pub data: Vec<u8>,
    pub width: u32,
    pub diffusion: bool,
    pub alignment: Alignment,
}

fn as_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(data))
}

/// Ordered directives for a single printer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrinterTarget {
    commands: Vec<PrinterCommand>,
}

impl PrinterTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PrinterCommand) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn commands(&self) -> &[PrinterCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Command payload for one print call.
///
/// Wraps exactly one printer target and cannot be modified once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    printer: PrinterTarget,
}

impl CompiledDocument {
    pub fn new(printer: PrinterTarget) -> Self {
        Self { printer }
    }

    pub fn printer(&self) -> &PrinterTarget {
        &self.printer
    }

    pub fn printers(&self) -> &[PrinterTarget] {
        std::slice::from_ref(&self.printer)
    }

    /// JSON command string handed to the device SDK.
    pub fn to_commands(&self) -> String {
        json!({
            "document": {
                "printer": self.printer.commands(),
            }
        })
        .to_string()
    }
}
