mod decode;
mod options;

pub use decode::decode_instructions;
pub use options::{Alignment, Charset, CutType, DrawerChannel};

use serde::{Deserialize, Serialize};

/// Dots across an 80mm head; used when a bitmap instruction gives no width.
pub const DEFAULT_BITMAP_WIDTH: u32 = 576;

/// One abstract print instruction, in the order the caller supplied it.
///
/// Option values stay as the caller spelled them; the command compiler
/// resolves them to device settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PrintInstruction {
    SetEncoding { charset: String },
    CutPaper { cut: String },
    OpenDrawer,
    AppendBitmap(BitmapInstruction),
    AppendText { text: String },
    /// Instruction this bridge does not know; skipped at compile time.
    Unsupported { tag: String },
}

impl PrintInstruction {
    pub fn set_encoding(charset: impl Into<String>) -> Self {
        Self::SetEncoding {
            charset: charset.into(),
        }
    }

    pub fn cut_paper(cut: impl Into<String>) -> Self {
        Self::CutPaper { cut: cut.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::AppendText { text: text.into() }
    }

    pub fn bitmap(path: impl Into<String>) -> Self {
        Self::AppendBitmap(BitmapInstruction::new(path))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetEncoding { .. } => "SetEncoding",
            Self::CutPaper { .. } => "CutPaper",
            Self::OpenDrawer => "OpenDrawer",
            Self::AppendBitmap(_) => "AppendBitmap",
            Self::AppendText { .. } => "AppendText",
            Self::Unsupported { .. } => "Unsupported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitmapInstruction {
    pub path: String,
    pub width: Option<u32>,
    pub diffusion: Option<bool>,
    pub alignment: Option<String>,
}

impl BitmapInstruction {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            width: None,
            diffusion: None,
            alignment: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_BITMAP_WIDTH)
    }

    pub fn diffusion(&self) -> bool {
        self.diffusion.unwrap_or(true)
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
            .as_deref()
            .map(Alignment::from_name)
            .unwrap_or_default()
    }
}
