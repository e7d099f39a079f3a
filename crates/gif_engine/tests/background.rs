use std::sync::{Arc, Once};
use std::time::Duration;

use gif_engine::{
    BackgroundHandle, BrowserEvent, CompletedRequest, EngineConfig, KeyValueStore, MemoryStore,
    MessagingError, StoreError, StoreQuery, StoreRequest, StoreResponse, TabStatus, TabUpdate,
    TabUrlStore,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn completed(tab_id: i64, url: &str) -> BrowserEvent {
    BrowserEvent::RequestCompleted(CompletedRequest {
        tab_id,
        url: url.to_string(),
    })
}

fn spawn_memory() -> (Arc<TabUrlStore<MemoryStore>>, BackgroundHandle) {
    let store = Arc::new(TabUrlStore::new(MemoryStore::new()));
    let handle = BackgroundHandle::spawn(store.clone(), &EngineConfig::default()).unwrap();
    (store, handle)
}

#[tokio::test]
async fn posted_events_are_visible_to_later_queries() {
    init_logging();
    let (_store, handle) = spawn_memory();
    assert!(handle.post(completed(7, "https://example.com/a.gif")));
    assert!(handle.post(completed(7, "https://example.com/b.png")));

    let urls = handle.query_client().network_gifs(7).await.unwrap();

    assert_eq!(urls, vec!["https://example.com/a.gif".to_string()]);
}

#[tokio::test]
async fn navigation_clear_applies_in_delivery_order() {
    init_logging();
    let (_store, handle) = spawn_memory();
    handle.post(completed(3, "https://old.test/x.gif"));
    handle.post(BrowserEvent::TabUpdated(TabUpdate {
        tab_id: 3,
        status: Some(TabStatus::Loading),
    }));
    handle.post(completed(3, "https://new.test/y.gif"));

    let urls = handle.query_client().network_gifs(3).await.unwrap();

    assert_eq!(urls, vec!["https://new.test/y.gif".to_string()]);
}

#[tokio::test]
async fn raw_request_returns_wire_response() {
    init_logging();
    let (store, handle) = spawn_memory();
    store.record_if_gif(2, "https://x.test/direct.gif").await;

    let response = handle
        .query_client()
        .request(StoreRequest::GetNetworkGifs { tab_id: 2 })
        .await
        .unwrap();

    assert_eq!(
        response,
        StoreResponse {
            urls: vec!["https://x.test/direct.gif".to_string()]
        }
    );
}

#[tokio::test]
async fn query_after_shutdown_reports_disconnected() {
    init_logging();
    let (_store, handle) = spawn_memory();
    let client = handle.query_client();

    handle.shutdown();

    assert!(!handle.post(completed(1, "https://x.test/late.gif")));
    assert_eq!(
        client.network_gifs(1).await,
        Err(MessagingError::Disconnected)
    );
}

struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
}

#[async_trait::async_trait]
impl KeyValueStore for SlowStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<String>) -> Result<(), StoreError> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key).await
    }
}

#[tokio::test]
async fn slow_store_times_out() {
    init_logging();
    let store = Arc::new(TabUrlStore::new(SlowStore {
        inner: MemoryStore::new(),
        delay: Duration::from_millis(300),
    }));
    let config = EngineConfig {
        message_timeout: Duration::from_millis(50),
        ..EngineConfig::default()
    };
    let handle = BackgroundHandle::spawn(store, &config).unwrap();

    let result = handle.query_client().network_gifs(1).await;

    assert_eq!(result, Err(MessagingError::Timeout(Duration::from_millis(50))));
}

#[test]
fn events_use_host_wire_shapes() {
    let request: BrowserEvent = serde_json::from_value(json!({
        "type": "requestCompleted",
        "tabId": 7,
        "url": "https://example.com/a.gif"
    }))
    .unwrap();
    assert_eq!(request, completed(7, "https://example.com/a.gif"));

    let update: BrowserEvent = serde_json::from_value(json!({
        "type": "tabUpdated",
        "tabId": 7,
        "status": "loading"
    }))
    .unwrap();
    assert_eq!(
        update,
        BrowserEvent::TabUpdated(TabUpdate {
            tab_id: 7,
            status: Some(TabStatus::Loading)
        })
    );

    let unknown_status: BrowserEvent = serde_json::from_value(json!({
        "type": "tabUpdated",
        "tabId": 7,
        "status": "unloaded"
    }))
    .unwrap();
    assert_eq!(
        unknown_status,
        BrowserEvent::TabUpdated(TabUpdate {
            tab_id: 7,
            status: Some(TabStatus::Other)
        })
    );

    let removed: BrowserEvent =
        serde_json::from_value(json!({"type": "tabRemoved", "tabId": 7})).unwrap();
    assert_eq!(removed, BrowserEvent::TabRemoved { tab_id: 7 });
}

#[test]
fn store_messages_use_host_wire_shapes() {
    let request = serde_json::to_value(StoreRequest::GetNetworkGifs { tab_id: 7 }).unwrap();
    assert_eq!(request, json!({"action": "getNetworkGifs", "tabId": 7}));

    let response: StoreResponse = serde_json::from_value(json!({})).unwrap();
    assert!(response.urls.is_empty());
}
