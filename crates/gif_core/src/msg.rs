use crate::{AggregatedEntry, ExportFormat, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User clicked Scan; `active_tab` is `None` when no tab could be resolved.
    ScanClicked { active_tab: Option<TabId> },
    /// The scan effect produced a merged list.
    ScanCompleted { entries: Vec<AggregatedEntry> },
    /// The scan effect failed as a whole.
    ScanFailed { message: String },
    /// User clicked a row in the list.
    CopyClicked { index: usize },
    /// Clipboard write succeeded.
    Copied,
    /// Clipboard write failed.
    CopyFailed { message: String },
    /// User clicked one of the export buttons.
    ExportClicked { format: ExportFormat },
    /// Export effect finished; `Ok` carries the written file name.
    ExportFinished { result: Result<String, String> },
    /// UI/render tick to coalesce rendering and expire toasts.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
