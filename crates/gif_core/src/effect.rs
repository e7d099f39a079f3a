use crate::{AggregatedEntry, ExportFormat, TabId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RunScan { active_tab: Option<TabId> },
    CopyToClipboard { url: String },
    Export {
        format: ExportFormat,
        entries: Vec<AggregatedEntry>,
    },
}
