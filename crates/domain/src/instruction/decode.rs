use serde_json::{Map, Value};

use super::{BitmapInstruction, PrintInstruction};
use crate::error::{PrinterError, Result};

const APPEND_ENCODING: &str = "appendEncoding";
const APPEND_CUT_PAPER: &str = "appendCutPaper";
const OPEN_CASH_DRAWER: &str = "openCashDrawer";
const APPEND_BITMAP: &str = "appendBitmap";
const APPEND_BITMAP_TEXT: &str = "appendBitmapText";

/// Decodes the `printCommands` list of key/value dictionaries.
///
/// Each dictionary is matched against the known keys in a fixed order; a key
/// whose value has the wrong shape is skipped and matching continues with
/// the next key. Dictionaries matching nothing become `Unsupported`.
pub fn decode_instructions(commands: &Value) -> Result<Vec<PrintInstruction>> {
    let list = commands
        .as_array()
        .ok_or_else(|| PrinterError::invalid_argument("Print commands must be a list"))?;

    list.iter()
        .enumerate()
        .map(|(index, command)| {
            command
                .as_object()
                .map(decode_one)
                .ok_or_else(|| {
                    PrinterError::invalid_argument(format!(
                        "Print command at index {index} must be an object"
                    ))
                })
        })
        .collect()
}

fn decode_one(command: &Map<String, Value>) -> PrintInstruction {
    if let Some(charset) = str_field(command, APPEND_ENCODING) {
        return PrintInstruction::set_encoding(charset);
    }
    if let Some(cut) = str_field(command, APPEND_CUT_PAPER) {
        return PrintInstruction::cut_paper(cut);
    }
    if command.contains_key(OPEN_CASH_DRAWER) {
        return PrintInstruction::OpenDrawer;
    }
    if let Some(path) = str_field(command, APPEND_BITMAP) {
        return PrintInstruction::AppendBitmap(BitmapInstruction {
            path: path.to_string(),
            width: command
                .get("width")
                .and_then(Value::as_u64)
                .and_then(|w| u32::try_from(w).ok()),
            diffusion: command.get("diffusion").and_then(Value::as_bool),
            alignment: str_field(command, "alignment").map(str::to_string),
        });
    }
    if let Some(text) = str_field(command, APPEND_BITMAP_TEXT) {
        return PrintInstruction::text(text);
    }

    let mut keys: Vec<&str> = command.keys().map(String::as_str).collect();
    keys.sort_unstable();
    PrintInstruction::Unsupported {
        tag: keys.join(","),
    }
}

fn str_field<'a>(command: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    command.get(key).and_then(Value::as_str)
}
