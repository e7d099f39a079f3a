use std::path::PathBuf;

use clap::Parser;
use gif_core::{ExportFormat, TabId};

use super::logging::LogDestination;

/// Scan a captured page for GIF URLs, merging what its markup references
/// with what the browser was seen loading.
#[derive(Debug, Parser)]
#[command(name = "gif_app", version, about)]
pub struct Cli {
    /// Saved HTML of the page to scan (bytes are charset-sniffed).
    #[arg(long, requires = "url")]
    pub page: Option<PathBuf>,

    /// Address the page was loaded from; relative references resolve against it.
    #[arg(long)]
    pub url: Option<String>,

    /// Id of the tab being scanned.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub tab: TabId,

    /// Scan as if no tab were focused.
    #[arg(long, conflicts_with = "tab")]
    pub no_active_tab: bool,

    /// JSON-lines file of browser events to replay into the background store.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Export the result list as `txt` or `json`.
    #[arg(long, value_parser = parse_format)]
    pub format: Option<ExportFormat>,

    /// Directory export files are written to.
    #[arg(long, default_value = "output")]
    pub out: PathBuf,

    /// Directory holding the persisted tab store; omit for an in-memory store.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Copy the row at this index to stdout after scanning.
    #[arg(long)]
    pub copy: Option<usize>,

    /// How long the scan waits for the background store, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,

    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn active_tab(&self) -> Option<TabId> {
        if self.no_active_tab {
            None
        } else {
            Some(self.tab)
        }
    }
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_name(value)
        .ok_or_else(|| format!("unknown export format `{value}` (expected txt or json)"))
}
