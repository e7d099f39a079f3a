//! Gif collector core: pure domain types, merge logic and the popup state machine.
mod aggregate;
mod effect;
mod export_format;
mod gif;
mod msg;
mod source;
mod state;
mod tab;
mod update;
mod view_model;

pub use aggregate::{merge_sources, AggregatedEntry};
pub use effect::Effect;
pub use export_format::ExportFormat;
pub use gif::{is_gif_href, is_gif_url};
pub use msg::Msg;
pub use source::{Source, Sources};
pub use state::{AppState, ScanState, TOAST_TICKS};
pub use tab::{is_tracked_tab, storage_key, TabId};
pub use update::update;
pub use view_model::{AppViewModel, EntryRowView};
