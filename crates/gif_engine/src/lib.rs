//! Gif collector engine: tab store, background events, DOM scan and export.
mod config;
mod decode;
mod dom;
mod engine;
mod export;
mod kv;
mod listeners;
mod messaging;
mod persist;
mod scan;
mod script;
mod store;

pub use config::EngineConfig;
pub use decode::{decode_page, DecodedPage};
pub use dom::{scan_document, CandidateUrl, DomScanner, Surface};
pub use engine::{BackgroundHandle, ChannelStoreQuery};
pub use export::{
    export_filename, parse_json_export, render_export, write_export, ExportError, ExportSummary,
};
pub use kv::{KeyValueStore, MemoryStore, StoreError};
pub use listeners::{BackgroundListener, BrowserEvent, CompletedRequest, TabStatus, TabUpdate};
pub use messaging::{MessagingError, StoreQuery, StoreRequest, StoreResponse};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use scan::{ScanError, ScanReport, Scanner};
pub use script::{DomSnapshot, ScriptError, ScriptExecutor, SnapshotExecutor};
pub use store::TabUrlStore;
