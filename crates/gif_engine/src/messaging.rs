use std::sync::Arc;
use std::time::Duration;

use gif_core::TabId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kv::KeyValueStore;
use crate::store::TabUrlStore;

/// Request sent from the UI side to the background store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum StoreRequest {
    GetNetworkGifs {
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    #[error("no response from background store within {0:?}")]
    Timeout(Duration),
    #[error("background store is not running")]
    Disconnected,
}

/// Query side of the store, as seen from the scan.
#[async_trait::async_trait]
pub trait StoreQuery: Send + Sync {
    async fn network_gifs(&self, tab_id: TabId) -> Result<Vec<String>, MessagingError>;
}

#[async_trait::async_trait]
impl<T: StoreQuery + ?Sized> StoreQuery for Arc<T> {
    async fn network_gifs(&self, tab_id: TabId) -> Result<Vec<String>, MessagingError> {
        (**self).network_gifs(tab_id).await
    }
}

/// In-process query straight against the store.
#[async_trait::async_trait]
impl<S: KeyValueStore> StoreQuery for TabUrlStore<S> {
    async fn network_gifs(&self, tab_id: TabId) -> Result<Vec<String>, MessagingError> {
        Ok(self.get(tab_id).await)
    }
}
