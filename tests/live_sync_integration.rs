//! Integration tests for live sync.
//!
//! These tests verify the end-to-end refresh flow:
//! 1. A dashboard loads its initial records and opens its channel
//! 2. Named events on the channel trigger a wholesale re-fetch
//! 3. Unmount tears everything down, and nothing fires afterwards
//!
//! Uses the in-memory channel hub and in-memory row sources, so no server
//! is needed.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ops_console::adapters::{InMemoryChannelHub, InMemoryRowSource, ScriptedFetch};
use ops_console::application::{
    EventTable, LiveDashboard, LiveSyncController, RecordStore, RowSourceAdapter,
};
use ops_console::config::{AppConfig, GridConfig, LiveSyncConfig};
use ops_console::domain::foundation::{DomainError, ListenerId};
use ops_console::domain::grid::{ColumnDescriptor, DataGrid};
use ops_console::domain::sync::{ChannelEvent, SyncState};
use ops_console::ports::{ChannelConnector, ChannelHandle, ChannelListener, RefreshAction};

const CALL_EVENTS: &[&str] = &["queue-update", "call-update", "status-change"];

// =============================================================================
// Test Infrastructure
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
struct QueuedCall {
    id: String,
    caller: String,
    status: String,
}

fn call(id: u32, status: &str) -> QueuedCall {
    QueuedCall {
        id: format!("C-{}", id),
        caller: format!("+1555000{:04}", id),
        status: status.to_string(),
    }
}

fn config() -> AppConfig {
    AppConfig {
        live_sync: LiveSyncConfig::default().with_endpoint("memory://hub"),
        ..Default::default()
    }
}

fn call_queue(
    source: &InMemoryRowSource<QueuedCall>,
    hub: &Arc<InMemoryChannelHub>,
) -> LiveDashboard<QueuedCall> {
    call_queue_with(source, hub, &config())
}

fn call_queue_with(
    source: &InMemoryRowSource<QueuedCall>,
    hub: &Arc<InMemoryChannelHub>,
    config: &AppConfig,
) -> LiveDashboard<QueuedCall> {
    let grid = DataGrid::new(
        Vec::new(),
        vec![
            ColumnDescriptor::field("Call", "id"),
            ColumnDescriptor::field("Caller", "caller"),
            ColumnDescriptor::field("Status", "status"),
        ],
        |c: &QueuedCall| c.id.clone(),
    );
    LiveDashboard::new(
        grid,
        Arc::new(source.clone()),
        hub.clone(),
        config,
        "calls",
        CALL_EVENTS,
    )
}

async fn wait_subscribed(dashboard: &LiveDashboard<QueuedCall>) {
    dashboard
        .controller()
        .state_changes()
        .wait_for(|state| *state == SyncState::Subscribed)
        .await
        .unwrap();
}

async fn wait_for_version(store: &RecordStore<QueuedCall>, version: u64) {
    store
        .subscribe()
        .wait_for(|snapshot| snapshot.version >= version)
        .await
        .unwrap();
}

/// Channel double that keeps hold of every listener it is given, so a test
/// can deliver an event after the controller has deregistered.
#[derive(Default)]
struct CapturedChannel {
    topics: Mutex<Vec<String>>,
    listeners: Mutex<Vec<(String, Arc<dyn ChannelListener>)>>,
    deregistered: AtomicUsize,
    closed: AtomicBool,
}

impl CapturedChannel {
    fn listener_for(&self, event_name: &str) -> Arc<dyn ChannelListener> {
        self.listeners
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == event_name)
            .map(|(_, listener)| Arc::clone(listener))
            .expect("listener registered")
    }
}

#[async_trait]
impl ChannelHandle for CapturedChannel {
    async fn subscribe(&self, topic: &str) -> Result<(), DomainError> {
        self.topics.lock().unwrap().push(topic.to_string());
        Ok(())
    }

    fn on(&self, event_name: &str, listener: Arc<dyn ChannelListener>) -> ListenerId {
        self.listeners
            .lock()
            .unwrap()
            .push((event_name.to_string(), listener));
        ListenerId::next()
    }

    fn off(&self, _listener_id: ListenerId) {
        self.deregistered.fetch_add(1, Ordering::SeqCst);
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

struct CapturingConnector {
    channel: Arc<CapturedChannel>,
}

#[async_trait]
impl ChannelConnector for CapturingConnector {
    async fn connect(&self, _endpoint: &str) -> Result<Arc<dyn ChannelHandle>, DomainError> {
        Ok(self.channel.clone())
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn mount_loads_then_subscribes_with_handshake() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let source = InMemoryRowSource::new(vec![call(1, "waiting"), call(2, "active")]);
    let mut dashboard = call_queue(&source, &hub);

    dashboard.mount().await.unwrap();
    wait_subscribed(&dashboard).await;

    assert_eq!(dashboard.render().row_keys(), vec!["C-1", "C-2"]);
    assert_eq!(hub.subscriber_count("calls"), 1);
    assert_eq!(hub.listener_count(), CALL_EVENTS.len());

    dashboard.unmount().await;
    assert_eq!(dashboard.sync_state(), SyncState::Closed);
    assert_eq!(hub.listener_count(), 0);
    assert_eq!(hub.open_channel_count(), 0);
}

#[tokio::test]
async fn event_delivered_after_unmount_never_refreshes() {
    let channel = Arc::new(CapturedChannel::default());
    let connector = Arc::new(CapturingConnector {
        channel: channel.clone(),
    });
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let store = Arc::new(RecordStore::new());
    let adapter: Arc<dyn RefreshAction> =
        Arc::new(RowSourceAdapter::new(Arc::new(source.clone()), store.clone()));
    let controller = LiveSyncController::new(
        connector,
        config().live_sync,
        "calls",
        EventTable::new().on("queue-update", adapter),
    );

    controller.mount().unwrap();
    controller
        .state_changes()
        .wait_for(|state| *state == SyncState::Subscribed)
        .await
        .unwrap();
    assert_eq!(*channel.topics.lock().unwrap(), vec!["calls"]);
    let in_flight = channel.listener_for("queue-update");

    controller.unmount().await;
    in_flight.on_event(ChannelEvent::named("queue-update"));
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(source.call_count(), 0);
    assert_eq!(store.version(), 0);
    assert_eq!(channel.deregistered.load(Ordering::SeqCst), 1);
    assert!(channel.closed.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn fetch_resolving_after_unmount_is_discarded() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let dashboard = call_queue(&source, &hub);
    dashboard.mount().await.unwrap();
    wait_subscribed(&dashboard).await;

    source.push(ScriptedFetch::Records {
        records: vec![call(9, "late")],
        delay: Duration::from_millis(500),
    });
    hub.publish("calls", ChannelEvent::named("queue-update"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.call_count(), 2);

    dashboard.unmount().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(dashboard.store().version(), 1);
    assert_eq!(&*dashboard.store().records(), &[call(1, "waiting")]);
}

#[tokio::test]
async fn unmount_before_connect_completes_leaks_nothing() {
    let hub = Arc::new(InMemoryChannelHub::new());
    hub.hold_connections();
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let dashboard = call_queue(&source, &hub);

    dashboard.mount().await.unwrap();
    dashboard
        .controller()
        .state_changes()
        .wait_for(|state| *state == SyncState::Connecting)
        .await
        .unwrap();
    dashboard.unmount().await;
    hub.release_connections();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(dashboard.sync_state(), SyncState::Closed);
    assert_eq!(hub.open_channel_count(), 0);
    assert_eq!(hub.listener_count(), 0);
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn every_mapped_event_name_triggers_the_same_refresh() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let dashboard = call_queue(&source, &hub);
    dashboard.mount().await.unwrap();
    wait_subscribed(&dashboard).await;

    for (i, name) in CALL_EVENTS.iter().enumerate() {
        hub.publish("calls", ChannelEvent::named(*name));
        wait_for_version(dashboard.store(), 2 + i as u64).await;
    }

    assert_eq!(source.call_count(), 1 + CALL_EVENTS.len());
    dashboard.unmount().await;
}

#[tokio::test]
async fn burst_of_events_is_never_dropped() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let dashboard = call_queue(&source, &hub);
    dashboard.mount().await.unwrap();
    wait_subscribed(&dashboard).await;

    for _ in 0..300 {
        hub.publish("calls", ChannelEvent::named("queue-update"));
    }
    wait_for_version(dashboard.store(), 1 + 300).await;

    assert_eq!(source.call_count(), 1 + 300);
    dashboard.unmount().await;
}

#[tokio::test]
async fn configured_page_size_drives_the_grid() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let calls: Vec<QueuedCall> = (1..=30).map(|n| call(n, "waiting")).collect();
    let source = InMemoryRowSource::new(calls);
    let config = AppConfig {
        grid: GridConfig { items_per_page: 4 },
        ..config()
    };
    let mut dashboard = call_queue_with(&source, &hub, &config);

    dashboard.mount().await.unwrap();
    let view = dashboard.render();

    assert_eq!(dashboard.grid().total_pages(), 8);
    assert_eq!(view.rows().len(), 4);
    dashboard.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn overlapping_refreshes_keep_the_last_resolved_result() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let mut dashboard = call_queue(&source, &hub);
    dashboard.mount().await.unwrap();
    wait_subscribed(&dashboard).await;

    // The first fetch is slow, the second fast
    source.push(ScriptedFetch::Records {
        records: vec![call(1, "slow")],
        delay: Duration::from_millis(300),
    });
    source.push(ScriptedFetch::Records {
        records: vec![call(1, "fast")],
        delay: Duration::from_millis(50),
    });
    hub.publish("calls", ChannelEvent::named("queue-update"));
    tokio::time::sleep(Duration::from_millis(1)).await;
    hub.publish("calls", ChannelEvent::named("queue-update"));

    wait_for_version(dashboard.store(), 3).await;

    assert_eq!(&*dashboard.store().records(), &[call(1, "slow")]);
    assert_eq!(dashboard.render().rows()[0].cells[2].value.plain_text(), "slow");
    dashboard.unmount().await;
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_keeps_last_good_records() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let mut dashboard = call_queue(&source, &hub);
    dashboard.mount().await.unwrap();
    wait_subscribed(&dashboard).await;

    source.push(ScriptedFetch::Failure {
        message: "upstream returned 502".to_string(),
        delay: Duration::ZERO,
    });
    hub.publish("calls", ChannelEvent::named("status-change"));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(source.call_count(), 2);
    assert_eq!(dashboard.store().version(), 1);
    assert_eq!(dashboard.render().row_keys(), vec!["C-1"]);
    assert_eq!(dashboard.sync_state(), SyncState::Subscribed);

    source.set_records(vec![call(1, "active"), call(2, "waiting")]);
    hub.publish("calls", ChannelEvent::named("status-change"));
    wait_for_version(dashboard.store(), 2).await;
    assert_eq!(dashboard.render().row_keys(), vec!["C-1", "C-2"]);

    dashboard.unmount().await;
}

#[tokio::test]
async fn connect_failure_leaves_initial_records_displayed() {
    let hub = Arc::new(InMemoryChannelHub::new());
    hub.fail_next_connect("connection refused");
    let source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let mut dashboard = call_queue(&source, &hub);

    dashboard.mount().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(dashboard.sync_state(), SyncState::Disconnected);
    assert_eq!(dashboard.render().row_keys(), vec!["C-1"]);
    dashboard.unmount().await;
    assert_eq!(dashboard.sync_state(), SyncState::Closed);
}

// =============================================================================
// Isolation
// =============================================================================

#[tokio::test]
async fn unmounting_one_view_leaves_the_other_live() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let queue_source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let overview_source = InMemoryRowSource::new(vec![call(1, "waiting")]);
    let queue = call_queue(&queue_source, &hub);
    let overview = call_queue(&overview_source, &hub);
    queue.mount().await.unwrap();
    overview.mount().await.unwrap();
    wait_subscribed(&queue).await;
    wait_subscribed(&overview).await;
    assert_eq!(hub.open_channel_count(), 2);

    queue.unmount().await;
    hub.publish("calls", ChannelEvent::named("queue-update"));
    wait_for_version(overview.store(), 2).await;

    assert_eq!(hub.open_channel_count(), 1);
    assert_eq!(queue_source.call_count(), 1);
    assert_eq!(overview_source.call_count(), 2);
    assert_eq!(overview.sync_state(), SyncState::Subscribed);
    overview.unmount().await;
}

#[tokio::test]
async fn many_views_mount_and_unmount_concurrently() {
    let hub = Arc::new(InMemoryChannelHub::new());
    let views: Vec<_> = (0..5)
        .map(|i| call_queue(&InMemoryRowSource::new(vec![call(i, "waiting")]), &hub))
        .collect();

    let mounted = futures::future::join_all(views.iter().map(|v| v.mount())).await;
    assert!(mounted.iter().all(|result| result.is_ok()));
    futures::future::join_all(views.iter().map(|v| wait_subscribed(v))).await;
    assert_eq!(hub.open_channel_count(), 5);

    futures::future::join_all(views.iter().map(|v| v.unmount())).await;

    assert_eq!(hub.open_channel_count(), 0);
    assert!(views.iter().all(|v| v.sync_state() == SyncState::Closed));
}
