use engine_logging::{engine_info, engine_warn};
use gif_core::{is_tracked_tab, merge_sources, AggregatedEntry, TabId};
use thiserror::Error;

use crate::messaging::StoreQuery;
use crate::script::ScriptExecutor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no active tab to scan")]
    NoActiveTab,
    #[error("tab {0} is not a browsable tab")]
    InvalidTab(TabId),
}

/// Outcome of one scan. Channel errors are kept for diagnostics only; they
/// never fail the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub tab_id: TabId,
    pub entries: Vec<AggregatedEntry>,
    pub dom_count: usize,
    pub network_count: usize,
    pub dom_error: Option<String>,
    pub network_error: Option<String>,
}

/// Combines a live DOM pass with the store's network observations.
pub struct Scanner<E, Q> {
    executor: E,
    query: Q,
}

impl<E: ScriptExecutor, Q: StoreQuery> Scanner<E, Q> {
    pub fn new(executor: E, query: Q) -> Self {
        Self { executor, query }
    }

    pub async fn run_scan(&self, active_tab: Option<TabId>) -> Result<ScanReport, ScanError> {
        let tab_id = active_tab.ok_or(ScanError::NoActiveTab)?;
        if !is_tracked_tab(tab_id) {
            return Err(ScanError::InvalidTab(tab_id));
        }
        engine_info!("scan started for tab {}", tab_id);

        let (dom, network) = tokio::join!(
            self.executor.scan_tab(tab_id),
            self.query.network_gifs(tab_id)
        );

        let (dom_urls, dom_error) = match dom {
            Ok(urls) => (urls, None),
            Err(err) => {
                engine_warn!("DOM scan failed for tab {}: {}", tab_id, err);
                (Vec::new(), Some(err.to_string()))
            }
        };
        let (network_urls, network_error) = match network {
            Ok(urls) => (urls, None),
            Err(err) => {
                engine_warn!("Network GIF query failed for tab {}: {}", tab_id, err);
                (Vec::new(), Some(err.to_string()))
            }
        };

        let dom_count = dom_urls.len();
        let network_count = network_urls.len();
        let entries = merge_sources(dom_urls, network_urls);
        engine_info!(
            "scan finished for tab {}: dom={} net={} merged={}",
            tab_id,
            dom_count,
            network_count,
            entries.len()
        );

        Ok(ScanReport {
            tab_id,
            entries,
            dom_count,
            network_count,
            dom_error,
            network_error,
        })
    }
}
