use serde::{Deserialize, Serialize};

/// Raw flags as reported by the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub online: bool,
    pub cover_open: bool,
    pub cutter_error: bool,
    pub paper_empty: bool,
    pub over_temp: bool,
}

impl StatusSnapshot {
    /// An online printer with no fault flags raised
    pub fn healthy() -> Self {
        Self {
            online: true,
            ..Self::default()
        }
    }
}

/// Normalized status handed back to callers and to the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub offline: bool,
    pub cover_open: bool,
    pub cutter_error: bool,
    pub receipt_paper_empty: bool,
    pub over_temp: bool,
    pub is_success: bool,
}
