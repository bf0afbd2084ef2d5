use serde::{Deserialize, Serialize};

/// Text encodings the printer target accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charset {
    #[serde(rename = "US-ASCII")]
    UsAscii,
    #[serde(rename = "Windows-1252")]
    Windows1252,
    #[serde(rename = "Shift-JIS")]
    ShiftJis,
    #[serde(rename = "UTF-8")]
    Utf8,
}

impl Charset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsAscii => "US-ASCII",
            Self::Windows1252 => "Windows-1252",
            Self::ShiftJis => "Shift-JIS",
            Self::Utf8 => "UTF-8",
        }
    }

    /// Unrecognized names fall back to UTF-8.
    pub fn normalize(name: &str) -> Self {
        [Self::UsAscii, Self::Windows1252, Self::ShiftJis]
            .into_iter()
            .find(|charset| charset.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Self::Utf8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutType {
    Full,
    Partial,
}

impl CutType {
    /// `"PartialCut"` selects a partial cut; every other value cuts fully.
    pub fn from_name(name: &str) -> Self {
        match name {
            "PartialCut" => Self::Partial,
            _ => Self::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Center" => Self::Center,
            "Right" => Self::Right,
            _ => Self::Left,
        }
    }
}

/// Cash drawer channel. Only the first channel is wired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawerChannel {
    #[default]
    #[serde(rename = "1")]
    No1,
}
