use engine_logging::{engine_debug, engine_error, engine_trace, engine_warn};
use gif_core::{is_gif_url, is_tracked_tab, storage_key, TabId};
use tokio::sync::Mutex;

use crate::kv::KeyValueStore;

/// Per-tab set of GIF URLs seen in completed network requests.
///
/// Classification happens on write, so the backend never holds non-GIF
/// URLs. Writes go through one async lock: a read-add-persist for a tab is
/// never interleaved with another write.
pub struct TabUrlStore<S> {
    backend: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> TabUrlStore<S> {
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Adds `url` to the tab's set if it looks like a GIF.
    ///
    /// Returns `true` when the URL is in the set afterwards. Background tabs,
    /// non-GIF URLs and store failures all yield `false`.
    pub async fn record_if_gif(&self, tab_id: TabId, url: &str) -> bool {
        if !is_tracked_tab(tab_id) {
            engine_trace!("ignoring request without visible tab: tab_id={} url={}", tab_id, url);
            return false;
        }
        if !is_gif_url(url) {
            return false;
        }

        let key = storage_key(tab_id);
        let _guard = self.write_lock.lock().await;

        let mut urls = match self.backend.get(&key).await {
            Ok(existing) => existing.unwrap_or_default(),
            Err(err) => {
                engine_warn!("Failed to read {}: {}", key, err);
                return false;
            }
        };
        if urls.iter().any(|known| known == url) {
            return true;
        }
        urls.push(url.to_string());

        match self.backend.set(&key, urls).await {
            Ok(()) => {
                engine_debug!("recorded gif for tab {}: {}", tab_id, url);
                true
            }
            Err(err) => {
                engine_error!("Failed to persist {}: {}", key, err);
                false
            }
        }
    }

    /// Drops everything recorded for the tab. Clearing an absent tab is a no-op.
    pub async fn clear(&self, tab_id: TabId) {
        let key = storage_key(tab_id);
        let _guard = self.write_lock.lock().await;
        match self.backend.remove(&key).await {
            Ok(()) => engine_debug!("cleared {}", key),
            Err(err) => engine_warn!("Failed to clear {}: {}", key, err),
        }
    }

    /// Current URLs for the tab; empty when nothing was recorded.
    pub async fn get(&self, tab_id: TabId) -> Vec<String> {
        let key = storage_key(tab_id);
        match self.backend.get(&key).await {
            Ok(urls) => urls.unwrap_or_default(),
            Err(err) => {
                engine_warn!("Failed to read {}: {}", key, err);
                Vec::new()
            }
        }
    }
}
