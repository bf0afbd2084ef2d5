use domain::{StatusReport, StatusSnapshot};

/// Projects a raw device snapshot onto the caller-facing report.
///
/// `offline` and `is_success` are both derived from the online flag.
pub fn normalize(raw: &StatusSnapshot) -> StatusReport {
    StatusReport {
        offline: !raw.online,
        cover_open: raw.cover_open,
        cutter_error: raw.cutter_error,
        receipt_paper_empty: raw.paper_empty,
        over_temp: raw.over_temp,
        is_success: raw.online,
    }
}
