use crate::view_model::{AppViewModel, EntryRowView};
use crate::AggregatedEntry;

/// Number of render ticks a toast stays visible (~1.5 s at 75 ms per tick).
pub const TOAST_TICKS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Status {
    #[default]
    Ready,
    Scanning,
    Found(usize),
    Failed(String),
}

impl Status {
    fn text(&self) -> String {
        match self {
            Status::Ready => "Ready.".to_string(),
            Status::Scanning => "Scanning…".to_string(),
            Status::Found(0) => "No GIFs found on this page.".to_string(),
            Status::Found(count) => {
                let plural = if *count == 1 { "" } else { "s" };
                format!("Found {count} GIF{plural} · click a URL to copy")
            }
            Status::Failed(message) => format!("Error: {message}"),
        }
    }
}

/// Transient popup session: the last scan's entries plus status/toast text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    scan: ScanState,
    entries: Vec<AggregatedEntry>,
    status: Status,
    toast: Option<(String, u32)>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan_state(&self) -> ScanState {
        self.scan
    }

    pub fn entries(&self) -> &[AggregatedEntry] {
        &self.entries
    }

    pub fn view(&self) -> AppViewModel {
        let idle = self.scan == ScanState::Idle;
        AppViewModel {
            scan_state: self.scan,
            status: self.status.text(),
            toast: self.toast.as_ref().map(|(text, _)| text.clone()),
            scan_enabled: idle,
            export_enabled: idle && !self.entries.is_empty(),
            rows: self
                .entries
                .iter()
                .map(|entry| EntryRowView {
                    url: entry.url.clone(),
                    badge: entry.badge(),
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_scan(&mut self) {
        self.scan = ScanState::Scanning;
        self.entries.clear();
        self.status = Status::Scanning;
        self.dirty = true;
    }

    pub(crate) fn finish_scan(&mut self, entries: Vec<AggregatedEntry>) {
        self.scan = ScanState::Idle;
        self.status = Status::Found(entries.len());
        self.entries = entries;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.scan = ScanState::Idle;
        self.status = Status::Failed(message);
        self.dirty = true;
    }

    pub(crate) fn show_toast(&mut self, text: impl Into<String>) {
        self.toast = Some((text.into(), TOAST_TICKS));
        self.dirty = true;
    }

    pub(crate) fn tick(&mut self) {
        if let Some((_, remaining)) = self.toast.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.toast = None;
                self.dirty = true;
            }
        }
    }
}
