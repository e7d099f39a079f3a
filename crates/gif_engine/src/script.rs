use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use engine_logging::engine_debug;
use gif_core::TabId;
use thiserror::Error;
use url::Url;

use crate::decode::decode_page;
use crate::dom::scan_document;
use crate::EngineConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("cannot access tab {tab_id}: {reason}")]
    AccessDenied { tab_id: TabId, reason: String },
    #[error("script execution failed: {0}")]
    Failed(String),
}

/// Runs the GIF extraction pass inside a tab's document and hands back the
/// serialized result.
#[async_trait::async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn scan_tab(&self, tab_id: TabId) -> Result<Vec<String>, ScriptError>;
}

#[async_trait::async_trait]
impl<T: ScriptExecutor + ?Sized> ScriptExecutor for Arc<T> {
    async fn scan_tab(&self, tab_id: TabId) -> Result<Vec<String>, ScriptError> {
        (**self).scan_tab(tab_id).await
    }
}

/// Rendered markup of a tab plus the URL it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomSnapshot {
    pub html: String,
    pub page_url: String,
}

impl DomSnapshot {
    pub fn new(html: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            page_url: page_url.into(),
        }
    }

    pub fn from_bytes(
        bytes: &[u8],
        content_type: Option<&str>,
        page_url: impl Into<String>,
    ) -> Self {
        let decoded = decode_page(bytes, content_type);
        engine_debug!("decoded snapshot as {}", decoded.encoding_label);
        Self::new(decoded.html, page_url)
    }
}

/// Executor backed by captured snapshots, one per tab.
#[derive(Debug, Default)]
pub struct SnapshotExecutor {
    snapshots: RwLock<HashMap<TabId, DomSnapshot>>,
    restricted_schemes: Vec<String>,
}

impl SnapshotExecutor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            restricted_schemes: config.restricted_schemes.clone(),
        }
    }

    pub fn insert(&self, tab_id: TabId, snapshot: DomSnapshot) {
        self.snapshots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(tab_id, snapshot);
    }

    pub fn remove(&self, tab_id: TabId) -> Option<DomSnapshot> {
        self.snapshots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&tab_id)
    }

    fn snapshot(&self, tab_id: TabId) -> Option<DomSnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&tab_id)
            .cloned()
    }

    fn check_access(&self, tab_id: TabId, page_url: &str) -> Result<(), ScriptError> {
        let parsed = Url::parse(page_url).map_err(|err| ScriptError::AccessDenied {
            tab_id,
            reason: format!("invalid page url: {err}"),
        })?;
        let scheme = parsed.scheme();
        if self
            .restricted_schemes
            .iter()
            .any(|restricted| restricted.eq_ignore_ascii_case(scheme))
        {
            return Err(ScriptError::AccessDenied {
                tab_id,
                reason: format!("{scheme}: pages cannot be scripted"),
            });
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ScriptExecutor for SnapshotExecutor {
    async fn scan_tab(&self, tab_id: TabId) -> Result<Vec<String>, ScriptError> {
        let snapshot = self.snapshot(tab_id).ok_or_else(|| ScriptError::AccessDenied {
            tab_id,
            reason: "no document loaded".to_string(),
        })?;
        self.check_access(tab_id, &snapshot.page_url)?;
        Ok(scan_document(&snapshot.html, &snapshot.page_url))
    }
}
