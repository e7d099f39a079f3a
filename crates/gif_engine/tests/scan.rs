use std::sync::{Arc, Once};

use gif_core::{Source, Sources};
use gif_engine::{
    BackgroundHandle, BrowserEvent, CompletedRequest, DomSnapshot, EngineConfig, MemoryStore,
    MessagingError, ScanError, Scanner, ScriptError, ScriptExecutor, SnapshotExecutor, StoreQuery,
    TabUrlStore,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

struct FixedDom(Vec<&'static str>);

#[async_trait::async_trait]
impl ScriptExecutor for FixedDom {
    async fn scan_tab(&self, _tab_id: i64) -> Result<Vec<String>, ScriptError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct DeniedDom;

#[async_trait::async_trait]
impl ScriptExecutor for DeniedDom {
    async fn scan_tab(&self, tab_id: i64) -> Result<Vec<String>, ScriptError> {
        Err(ScriptError::AccessDenied {
            tab_id,
            reason: "restricted page".to_string(),
        })
    }
}

struct FixedNet(Vec<&'static str>);

#[async_trait::async_trait]
impl StoreQuery for FixedNet {
    async fn network_gifs(&self, _tab_id: i64) -> Result<Vec<String>, MessagingError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct BrokenNet;

#[async_trait::async_trait]
impl StoreQuery for BrokenNet {
    async fn network_gifs(&self, _tab_id: i64) -> Result<Vec<String>, MessagingError> {
        Err(MessagingError::Disconnected)
    }
}

fn both() -> Sources {
    [Source::Dom, Source::Network].into_iter().collect()
}

#[tokio::test]
async fn overlapping_channels_merge_into_three_entries() {
    init_logging();
    let scanner = Scanner::new(FixedDom(vec!["U1", "U2"]), FixedNet(vec!["U2", "U3"]));

    let report = scanner.run_scan(Some(4)).await.unwrap();

    assert_eq!(report.tab_id, 4);
    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.entries[0].url, "U1");
    assert_eq!(report.entries[0].sources, Sources::only(Source::Dom));
    assert_eq!(report.entries[1].url, "U2");
    assert_eq!(report.entries[1].sources, both());
    assert_eq!(report.entries[2].url, "U3");
    assert_eq!(report.entries[2].sources, Sources::only(Source::Network));
    assert_eq!((report.dom_count, report.network_count), (2, 2));
}

#[tokio::test]
async fn denied_script_contributes_nothing() {
    init_logging();
    let scanner = Scanner::new(DeniedDom, FixedNet(vec!["https://x.test/n.gif"]));

    let report = scanner.run_scan(Some(1)).await.unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].sources, Sources::only(Source::Network));
    assert!(report
        .dom_error
        .as_deref()
        .unwrap()
        .contains("restricted page"));
    assert_eq!(report.network_error, None);
}

#[tokio::test]
async fn failed_store_query_contributes_nothing() {
    init_logging();
    let scanner = Scanner::new(FixedDom(vec!["https://x.test/d.gif"]), BrokenNet);

    let report = scanner.run_scan(Some(1)).await.unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].sources, Sources::only(Source::Dom));
    assert!(report.network_error.is_some());
}

#[tokio::test]
async fn both_channels_failing_is_an_empty_result_not_an_error() {
    init_logging();
    let scanner = Scanner::new(DeniedDom, BrokenNet);

    let report = scanner.run_scan(Some(1)).await.unwrap();

    assert!(report.entries.is_empty());
}

#[tokio::test]
async fn missing_or_background_tab_is_a_scan_error() {
    init_logging();
    let scanner = Scanner::new(FixedDom(vec![]), FixedNet(vec![]));

    assert_eq!(scanner.run_scan(None).await, Err(ScanError::NoActiveTab));
    assert_eq!(scanner.run_scan(Some(-1)).await, Err(ScanError::InvalidTab(-1)));
}

#[tokio::test]
async fn snapshot_executor_refuses_restricted_and_unknown_tabs() {
    init_logging();
    let executor = SnapshotExecutor::new(&EngineConfig::default());
    executor.insert(
        1,
        DomSnapshot::new(r#"<img src="x.gif">"#, "chrome://settings/"),
    );

    assert!(matches!(
        executor.scan_tab(1).await,
        Err(ScriptError::AccessDenied { tab_id: 1, .. })
    ));
    assert!(matches!(
        executor.scan_tab(2).await,
        Err(ScriptError::AccessDenied { tab_id: 2, .. })
    ));
}

#[tokio::test]
async fn removed_snapshot_is_no_longer_scannable() {
    init_logging();
    let executor = SnapshotExecutor::new(&EngineConfig::default());
    let snapshot = DomSnapshot::new(r#"<img src="/a.gif">"#, "https://x.test/");
    executor.insert(3, snapshot.clone());
    assert_eq!(
        executor.scan_tab(3).await.unwrap(),
        vec!["https://x.test/a.gif".to_string()]
    );

    assert_eq!(executor.remove(3), Some(snapshot));

    assert!(matches!(
        executor.scan_tab(3).await,
        Err(ScriptError::AccessDenied { tab_id: 3, .. })
    ));
    assert_eq!(executor.remove(3), None);
}

#[tokio::test]
async fn end_to_end_with_background_store_and_snapshot() {
    init_logging();
    let config = EngineConfig::default();
    let store = Arc::new(TabUrlStore::new(MemoryStore::new()));
    let handle = BackgroundHandle::spawn(store, &config).unwrap();
    for url in [
        "https://site.test/shared.gif",
        "https://cdn.test/only-net.gif",
        "https://cdn.test/photo.jpg",
    ] {
        handle.post(BrowserEvent::RequestCompleted(CompletedRequest {
            tab_id: 9,
            url: url.to_string(),
        }));
    }

    let executor = Arc::new(SnapshotExecutor::new(&config));
    executor.insert(
        9,
        DomSnapshot::new(
            r#"<img src="/shared.gif"><div style="background:url(only-dom.gif)"></div>"#,
            "https://site.test/index.html",
        ),
    );
    let scanner = Scanner::new(executor, handle.query_client());

    let report = scanner.run_scan(Some(9)).await.unwrap();
    let rows: Vec<_> = report
        .entries
        .iter()
        .map(|e| (e.url.as_str(), e.badge()))
        .collect();

    assert_eq!(
        rows,
        vec![
            ("https://site.test/shared.gif", "dom+net".to_string()),
            ("https://site.test/only-dom.gif", "dom".to_string()),
            ("https://cdn.test/only-net.gif", "net".to_string()),
        ]
    );
}
