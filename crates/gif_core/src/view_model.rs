use crate::ScanState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub scan_state: ScanState,
    pub status: String,
    /// Short-lived notice such as `Copied!`.
    pub toast: Option<String>,
    pub scan_enabled: bool,
    pub export_enabled: bool,
    pub rows: Vec<EntryRowView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRowView {
    pub url: String,
    pub badge: String,
}
