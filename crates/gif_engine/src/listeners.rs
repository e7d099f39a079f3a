//! Background event handlers that keep the tab store in step with the browser.
//!
//! Each host event has one handler. Wire shapes follow the host's camelCase
//! JSON so captured sessions can be replayed as-is.

use engine_logging::engine_debug;
use gif_core::TabId;
use serde::{Deserialize, Serialize};

use crate::kv::KeyValueStore;
use crate::messaging::{StoreRequest, StoreResponse};
use crate::store::TabUrlStore;

/// A network transfer finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedRequest {
    pub tab_id: TabId,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
    #[serde(other)]
    Other,
}

/// A tab changed state. `status` is absent for title/favicon-only updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdate {
    pub tab_id: TabId,
    #[serde(default)]
    pub status: Option<TabStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BrowserEvent {
    RequestCompleted(CompletedRequest),
    TabUpdated(TabUpdate),
    TabRemoved {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
}

#[async_trait::async_trait]
pub trait BackgroundListener: Send + Sync {
    /// Returns whether the URL was recorded.
    async fn on_request_completed(&self, request: &CompletedRequest) -> bool;

    /// Returns whether the update cleared the tab.
    async fn on_tab_updated(&self, update: &TabUpdate) -> bool;

    async fn on_tab_removed(&self, tab_id: TabId);

    async fn on_message(&self, request: StoreRequest) -> StoreResponse;

    async fn dispatch(&self, event: &BrowserEvent) {
        match event {
            BrowserEvent::RequestCompleted(request) => {
                self.on_request_completed(request).await;
            }
            BrowserEvent::TabUpdated(update) => {
                self.on_tab_updated(update).await;
            }
            BrowserEvent::TabRemoved { tab_id } => self.on_tab_removed(*tab_id).await,
        }
    }
}

#[async_trait::async_trait]
impl<S: KeyValueStore> BackgroundListener for TabUrlStore<S> {
    async fn on_request_completed(&self, request: &CompletedRequest) -> bool {
        self.record_if_gif(request.tab_id, &request.url).await
    }

    async fn on_tab_updated(&self, update: &TabUpdate) -> bool {
        // Only a new top-level load invalidates; same-document route changes
        // never report `loading`.
        if update.status != Some(TabStatus::Loading) {
            return false;
        }
        engine_debug!("tab {} started loading", update.tab_id);
        self.clear(update.tab_id).await;
        true
    }

    async fn on_tab_removed(&self, tab_id: TabId) {
        engine_debug!("tab {} closed", tab_id);
        self.clear(tab_id).await;
    }

    async fn on_message(&self, request: StoreRequest) -> StoreResponse {
        match request {
            StoreRequest::GetNetworkGifs { tab_id } => StoreResponse {
                urls: self.get(tab_id).await,
            },
        }
    }
}
