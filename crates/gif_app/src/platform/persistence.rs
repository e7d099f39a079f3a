use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use engine_logging::{engine_info, engine_warn};
use gif_engine::{AtomicFileWriter, KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".gif_store.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedStore {
    tabs: BTreeMap<String, Vec<String>>,
}

/// Key-value store kept in a RON file, rewritten whole on every change.
///
/// A missing or unreadable file starts the store empty.
pub struct RonFileStore {
    writer: AtomicFileWriter,
    entries: Mutex<BTreeMap<String, Vec<String>>>,
}

impl RonFileStore {
    pub fn open(dir: &Path) -> Self {
        let writer = AtomicFileWriter::new(PathBuf::from(dir));
        let entries = load_entries(&writer);
        Self {
            writer,
            entries: Mutex::new(entries),
        }
    }

    /// Applies `change` to a copy, persists the copy, and only then makes it
    /// visible. A failed write leaves both the file and the map untouched.
    fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, Vec<String>>),
    {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = entries.clone();
        change(&mut next);

        let state = PersistedStore { tabs: next };
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&state, pretty)
            .map_err(|err| StoreError::Backend(err.to_string()))?;
        self.writer.write(STATE_FILENAME, &content)?;
        *entries = state.tabs;
        Ok(())
    }
}

fn load_entries(writer: &AtomicFileWriter) -> BTreeMap<String, Vec<String>> {
    let content = match writer.read(STATE_FILENAME) {
        Ok(Some(text)) => text,
        Ok(None) => return BTreeMap::new(),
        Err(err) => {
            engine_warn!(
                "Failed to read persisted store from {:?}: {}",
                writer.dir(),
                err
            );
            return BTreeMap::new();
        }
    };

    match ron::from_str::<PersistedStore>(&content) {
        Ok(state) => {
            engine_info!(
                "Loaded {} persisted tab entries from {:?}",
                state.tabs.len(),
                writer.dir()
            );
            state.tabs
        }
        Err(err) => {
            engine_warn!(
                "Failed to parse persisted store from {:?}: {}",
                writer.dir(),
                err
            );
            BTreeMap::new()
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: Vec<String>) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn values_survive_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let store = RonFileStore::open(temp.path());
            store
                .set("tab_3", vec!["https://a.test/x.gif".to_string()])
                .await
                .unwrap();
            store.set("tab_4", vec![]).await.unwrap();
            store.remove("tab_4").await.unwrap();
        }

        let reopened = RonFileStore::open(temp.path());
        assert_eq!(
            reopened.get("tab_3").await.unwrap(),
            Some(vec!["https://a.test/x.gif".to_string()])
        );
        assert_eq!(reopened.get("tab_4").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(STATE_FILENAME), "not ron at all (").unwrap();

        let store = RonFileStore::open(temp.path());

        assert_eq!(store.get("tab_1").await.unwrap(), None);
        store.set("tab_1", vec!["u".to_string()]).await.unwrap();
        assert_eq!(
            RonFileStore::open(temp.path()).get("tab_1").await.unwrap(),
            Some(vec!["u".to_string()])
        );
    }

    #[tokio::test]
    async fn failed_write_leaves_entries_unchanged() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("store");
        fs::create_dir(&dir).unwrap();
        let store = RonFileStore::open(&dir);
        store.set("tab_2", vec!["u".to_string()]).await.unwrap();
        // Replace the directory with a regular file so the next write fails.
        fs::remove_dir_all(&dir).unwrap();
        fs::write(&dir, "not a directory").unwrap();

        assert!(store
            .set("tab_1", vec!["https://a.test/a.gif".to_string()])
            .await
            .is_err());
        assert!(store.remove("tab_2").await.is_err());

        assert_eq!(store.get("tab_1").await.unwrap(), None);
        assert_eq!(
            store.get("tab_2").await.unwrap(),
            Some(vec!["u".to_string()])
        );
    }

    #[tokio::test]
    async fn store_on_regular_file_path_rejects_writes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plain");
        fs::write(&path, "x").unwrap();
        let store = gif_engine::TabUrlStore::new(RonFileStore::open(&path));

        assert!(!store.record_if_gif(1, "https://a.test/a.gif").await);
        assert!(store.get(1).await.is_empty());
        assert_eq!(store.backend().get("tab_1").await.unwrap(), None);
    }
}
