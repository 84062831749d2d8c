mod common;

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use common::{MemoryStore, StubSource, channel, test_config};
use tvlogo_sync::models::{LogoAsset, LogoRef};
use tvlogo_sync::repositories::{JsonChannelStore, StoreDocument, StoredChannel};
use tvlogo_sync::services::{LogoPassCoordinator, PassCounters, PassReason, PassTrigger};

const LISTING: &[&str] = &[
    "countries/united-states/ESPN.png",
    "countries/united-states/CNN.svg",
    "countries/united-kingdom/BBC One.PNG",
    "README.md",
];

fn coordinator(
    root: &TempDir,
    source: Arc<StubSource>,
    store: Arc<MemoryStore>,
) -> LogoPassCoordinator {
    LogoPassCoordinator::new(&test_config(root.path()), source).with_store(store)
}

#[tokio::test]
async fn test_resolves_downloads_and_assigns() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![channel(
        "1",
        Some("espn"),
        Some("ESPN"),
        LogoRef::None,
    )]));

    let summary = coordinator(&root, source.clone(), store.clone()).run_now().await;

    assert!(summary.ok);
    assert_eq!(summary.reason, None);
    assert_eq!(summary.trigger, PassTrigger::Manual);
    assert_eq!(summary.downloaded(), 1);
    assert_eq!(summary.updated(), 1);
    assert_eq!(summary.skipped(), 0);
    assert_eq!(summary.missed(), 0);
    assert_eq!(summary.index_entries, 3);

    let written = root.path().join("logos").join("ESPN.png");
    assert_eq!(
        std::fs::read(&written).unwrap(),
        b"image:countries/united-states/ESPN.png"
    );
    assert_eq!(
        store.assignments().await,
        vec![("1".to_string(), "ESPN.png".to_string())]
    );
}

#[tokio::test]
async fn test_counts_each_channel_once() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![
        // real logo, left alone
        channel("1", Some("cnn"), Some("CNN"), LogoRef::Url("https://cdn/cnn.png".into())),
        // placeholder resolved by name after the id misses
        channel("2", Some("bbc1.uk"), Some("BBC One"), LogoRef::Url("logo.png".into())),
        // nothing matches
        channel("3", Some("unknown"), Some("Nowhere TV"), LogoRef::None),
        // falls back to name when the id is blank
        channel("4", Some("  "), Some("CNN"), LogoRef::None),
    ]));

    let summary = coordinator(&root, source.clone(), store.clone()).run_now().await;

    assert!(summary.ok);
    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.downloaded(), 2);
    assert_eq!(summary.updated(), 2);
    assert_eq!(summary.missed(), 1);
    assert!(root.path().join("logos").join("BBC One.png").exists());
    assert!(root.path().join("logos").join("CNN.svg").exists());
    assert_eq!(source.raw_fetches(), 2);
}

#[tokio::test]
async fn test_existing_asset_with_file_is_skipped() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![channel(
        "1",
        Some("espn"),
        Some("ESPN"),
        LogoRef::Asset {
            name: "ESPN".into(),
            file_path: Some("/data/logos/espn-custom.png".into()),
        },
    )]));

    let summary = coordinator(&root, source.clone(), store.clone()).run_now().await;

    assert_eq!(summary.skipped(), 1);
    assert_eq!(summary.downloaded(), 0);
    assert_eq!(source.raw_fetches(), 0);
    assert!(store.assignments().await.is_empty());
}

#[tokio::test]
async fn test_second_pass_within_freshness_window_is_locked() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![channel(
        "1",
        None,
        Some("ESPN"),
        LogoRef::None,
    )]));
    let coordinator = coordinator(&root, source.clone(), store.clone());

    let first = coordinator.run_now().await;
    let second = coordinator.run_now().await;

    assert!(!first.is_locked());
    assert!(second.is_locked());
    assert!(second.ok);
    assert_eq!(second.reason, Some(PassReason::Locked));
    assert_eq!(second.counters, PassCounters::default());
    assert_eq!(second.logos_dir, root.path().join("logos"));
    assert_eq!(source.tree_fetches(), 1);
    assert_eq!(store.assignments().await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_passes_only_one_runs() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![channel(
        "1",
        Some("espn"),
        None,
        LogoRef::None,
    )]));
    let coordinator = coordinator(&root, source.clone(), store.clone());

    let (a, b) = tokio::join!(coordinator.run_now(), coordinator.run_now());

    assert_eq!([a.is_locked(), b.is_locked()].iter().filter(|l| **l).count(), 1);
    assert_eq!(source.tree_fetches(), 1);
    assert_eq!(store.assignments().await.len(), 1);
}

#[tokio::test]
async fn test_separate_coordinators_share_marker_lock() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![]));

    let first = coordinator(&root, source.clone(), store.clone()).run_now().await;
    let second = coordinator(&root, source.clone(), store.clone()).run_now().await;

    assert!(!first.is_locked());
    assert!(second.is_locked());
}

#[tokio::test]
async fn test_missing_collaborators_reports_models_not_found() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));

    let summary = LogoPassCoordinator::new(&test_config(root.path()), source.clone())
        .run_now()
        .await;

    assert!(!summary.ok);
    assert_eq!(summary.reason, Some(PassReason::ModelsNotFound));
    assert_eq!(source.tree_fetches(), 0);
    assert!(root.path().join("logos").is_dir());
}

#[tokio::test]
async fn test_listing_failure_reports_query_error() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::failing_listing());

    let summary = coordinator(&root, source, store).run_now().await;

    assert!(!summary.ok);
    assert_eq!(summary.reason, Some(PassReason::QueryError));
    assert_eq!(summary.counters, PassCounters::default());
}

#[tokio::test]
async fn test_rate_limited_download_is_a_miss() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(
        StubSource::with_paths(LISTING).failing_raw("countries/united-states/ESPN.png", 403),
    );
    let store = Arc::new(MemoryStore::new(vec![
        channel("1", Some("espn"), None, LogoRef::None),
        channel("2", Some("cnn"), None, LogoRef::None),
    ]));

    let summary = coordinator(&root, source, store.clone()).run_now().await;

    assert!(summary.ok);
    assert_eq!(summary.missed(), 1);
    assert_eq!(summary.downloaded(), 1);
    assert_eq!(summary.updated(), 1);
    assert!(!root.path().join("logos").join("ESPN.png").exists());
}

#[tokio::test]
async fn test_assignment_failure_keeps_download() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(
        MemoryStore::new(vec![channel("1", Some("espn"), None, LogoRef::None)])
            .failing_assignment_for("1"),
    );

    let summary = coordinator(&root, source, store).run_now().await;

    assert!(summary.ok);
    assert_eq!(summary.downloaded(), 1);
    assert_eq!(summary.updated(), 0);
    assert_eq!(summary.missed(), 0);
    assert!(root.path().join("logos").join("ESPN.png").exists());
}

#[tokio::test]
async fn test_listing_failure_without_cache_misses_everything() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING).failing_tree(429));
    let store = Arc::new(MemoryStore::new(vec![
        channel("1", Some("espn"), None, LogoRef::None),
        channel("2", None, Some("CNN"), LogoRef::None),
    ]));

    let summary = coordinator(&root, source.clone(), store).run_now().await;

    assert!(summary.ok);
    assert_eq!(summary.index_entries, 0);
    assert_eq!(summary.missed(), 2);
    assert_eq!(source.raw_fetches(), 0);
}

#[tokio::test]
async fn test_index_cache_is_written_to_logos_dir() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![]));

    coordinator(&root, source, store).run_now().await;

    let cache = root.path().join("logos").join(".tvlogos_index.json");
    let parsed: Value = serde_json::from_slice(&std::fs::read(cache).unwrap()).unwrap();
    assert_eq!(parsed["espn"], "countries/united-states/ESPN.png");
    assert_eq!(parsed["bbc one"], "countries/united-kingdom/BBC One.PNG");
    assert!(parsed.get("readme").is_none());
}

#[tokio::test]
async fn test_autorun_schedules_once() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![channel(
        "1",
        Some("espn"),
        None,
        LogoRef::None,
    )]));
    let coordinator = Arc::new(coordinator(&root, source.clone(), store));

    let handle = coordinator.autorun(Duration::from_millis(10));
    assert!(handle.is_some());
    assert!(coordinator.autorun(Duration::from_millis(10)).is_none());

    let summary = handle.unwrap().await.unwrap();
    assert_eq!(summary.trigger, PassTrigger::Auto);
    assert_eq!(summary.updated(), 1);
    assert_eq!(source.tree_fetches(), 1);
}

#[tokio::test]
async fn test_summary_json_shape() {
    let root = TempDir::new().unwrap();
    let source = Arc::new(StubSource::with_paths(LISTING));
    let store = Arc::new(MemoryStore::new(vec![]));
    let coordinator = coordinator(&root, source, store);

    let done: Value = serde_json::to_value(coordinator.run_now().await).unwrap();
    assert_eq!(done["ok"], true);
    assert_eq!(done["updated"], 0);
    assert_eq!(done["trigger"], "manual");
    assert_eq!(done["index_origin"], "fresh");
    assert!(done.get("reason").is_none());

    let locked: Value = serde_json::to_value(coordinator.run_now().await).unwrap();
    assert_eq!(locked["ok"], true);
    assert_eq!(locked["reason"], "locked");
    assert_eq!(locked["missed"], 0);
    assert!(locked.get("index_origin").is_none());
}

#[tokio::test]
async fn test_json_store_end_to_end() {
    let root = TempDir::new().unwrap();
    let store_path = root.path().join("channels.json");
    let existing = LogoAsset::new("CNN", Some("/srv/logos/CNN.svg".into()));
    let document = StoreDocument {
        channels: vec![
            StoredChannel {
                id: "10".into(),
                tvg_id: Some("ESPN".into()),
                name: Some("ESPN".into()),
                logo_url: Some("default.png".into()),
                logo_id: None,
            },
            StoredChannel {
                id: "11".into(),
                name: Some("CNN".into()),
                logo_id: Some(existing.id),
                ..Default::default()
            },
        ],
        logos: vec![existing],
    };
    std::fs::write(&store_path, serde_json::to_vec(&document).unwrap()).unwrap();

    let store = Arc::new(JsonChannelStore::open(&store_path).await.unwrap());
    let source = Arc::new(StubSource::with_paths(LISTING));
    let summary = LogoPassCoordinator::new(&test_config(root.path()), source)
        .with_store(store)
        .run_now()
        .await;

    assert_eq!(summary.updated(), 1);
    assert_eq!(summary.skipped(), 1);

    let reopened = JsonChannelStore::open(&store_path).await.unwrap();
    let snapshot = reopened.snapshot().await;
    let espn = snapshot.logos.iter().find(|l| l.name == "ESPN").unwrap();
    assert_eq!(snapshot.channels[0].logo_id, Some(espn.id));
    assert!(espn.file_path.as_deref().unwrap().ends_with("ESPN.png"));
}
