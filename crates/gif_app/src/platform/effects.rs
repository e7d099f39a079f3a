use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use engine_logging::{engine_info, engine_warn};
use gif_core::{Effect, Msg};
use gif_engine::{write_export, ChannelStoreQuery, Scanner, SnapshotExecutor};
use tokio::runtime::Runtime;

/// Runs effects to completion and hands back the resulting messages.
pub struct EffectRunner {
    runtime: Runtime,
    scanner: Scanner<Arc<SnapshotExecutor>, ChannelStoreQuery>,
    export_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        runtime: Runtime,
        scanner: Scanner<Arc<SnapshotExecutor>, ChannelStoreQuery>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            runtime,
            scanner,
            export_dir,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        effects
            .into_iter()
            .map(|effect| self.run_one(effect))
            .collect()
    }

    fn run_one(&self, effect: Effect) -> Msg {
        match effect {
            Effect::RunScan { active_tab } => {
                match self.runtime.block_on(self.scanner.run_scan(active_tab)) {
                    Ok(report) => {
                        engine_info!(
                            "Scan of tab {} found {} entries (dom={}, net={})",
                            report.tab_id,
                            report.entries.len(),
                            report.dom_count,
                            report.network_count
                        );
                        Msg::ScanCompleted {
                            entries: report.entries,
                        }
                    }
                    Err(err) => Msg::ScanFailed {
                        message: err.to_string(),
                    },
                }
            }
            Effect::CopyToClipboard { url } => {
                let mut stdout = io::stdout().lock();
                match writeln!(stdout, "{}", url).and_then(|_| stdout.flush()) {
                    Ok(()) => Msg::Copied,
                    Err(err) => Msg::CopyFailed {
                        message: err.to_string(),
                    },
                }
            }
            Effect::Export { format, entries } => {
                let millis = Utc::now().timestamp_millis();
                let result = write_export(&self.export_dir, &entries, format, millis)
                    .map(|summary| {
                        summary
                            .path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_else(|| summary.path.display().to_string())
                    })
                    .map_err(|err| {
                        engine_warn!("Export to {:?} failed: {}", self.export_dir, err);
                        err.to_string()
                    });
                Msg::ExportFinished { result }
            }
        }
    }
}
