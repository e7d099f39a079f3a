/// Host-assigned tab identity. Stable across navigations, invalidated on close.
///
/// Requests that do not belong to a visible tab (prefetch, service workers)
/// carry a negative sentinel, usually `-1`.
pub type TabId = i64;

const STORAGE_KEY_PREFIX: &str = "tab_";

/// Key under which a tab's network-observed URLs are persisted.
pub fn storage_key(tab_id: TabId) -> String {
    format!("{STORAGE_KEY_PREFIX}{tab_id}")
}

/// Whether network traffic for `tab_id` should be tracked at all.
pub fn is_tracked_tab(tab_id: TabId) -> bool {
    tab_id >= 0
}
