//! LiveDashboard - composition root for one live table view.
//!
//! Wires the pieces together in the order a view needs them:
//!
//! 1. Row Source Adapter loads the initial record set into the store
//! 2. The Data Grid renders from the store's current snapshot
//! 3. The Live Sync Controller opens the view's channel; matching events
//!    re-run the adapter, which replaces the store's record set
//!
//! The grid picks up a new snapshot lazily on the next `render`.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::foundation::DomainError;
use crate::domain::grid::{DataGrid, GridView};
use crate::domain::sync::SyncState;
use crate::ports::{ChannelConnector, RefreshAction, RowSource};

use super::event_table::EventTable;
use super::live_sync::LiveSyncController;
use super::record_store::RecordStore;
use super::row_source_adapter::{RefreshOutcome, RowSourceAdapter};

/// One mounted table view with realtime refresh.
///
/// # Example
///
/// ```ignore
/// let grid = DataGrid::new(Vec::new(), columns, |call: &QueuedCall| call.id.clone());
/// let mut dashboard = LiveDashboard::new(
///     grid,
///     Arc::new(HttpRowSource::new(&config.row_source, "calls/queue")?),
///     connector,
///     &config,
///     "calls",
///     &["queue-update", "call-update", "status-change"],
/// );
///
/// dashboard.mount().await?;
/// println!("{}", dashboard.render());
/// ```
pub struct LiveDashboard<T> {
    grid: DataGrid<T>,
    store: Arc<RecordStore<T>>,
    adapter: Arc<RowSourceAdapter<T>>,
    controller: LiveSyncController,
    seen_version: Option<u64>,
}

impl<T> LiveDashboard<T>
where
    T: Serialize + Send + Sync + 'static,
{
    /// Build a dashboard whose every `refresh_events` name re-fetches
    /// the whole collection. The grid takes its page size from
    /// `config.grid`.
    pub fn new(
        grid: DataGrid<T>,
        source: Arc<dyn RowSource<T>>,
        connector: Arc<dyn ChannelConnector>,
        config: &AppConfig,
        topic: impl Into<String>,
        refresh_events: &[&str],
    ) -> Self {
        let store = Arc::new(RecordStore::new());
        let adapter = Arc::new(RowSourceAdapter::new(source, Arc::clone(&store)));
        let refresh: Arc<dyn RefreshAction> = adapter.clone();
        let table = EventTable::new().on_all(refresh_events.iter().copied(), refresh);
        let controller =
            LiveSyncController::new(connector, config.live_sync.clone(), topic, table);

        Self {
            grid: config.grid.apply(grid),
            store,
            adapter,
            controller,
            seen_version: None,
        }
    }

    /// Load the initial records, then open the live channel.
    ///
    /// A failed initial load is logged and the channel still opens, so the
    /// first matching event can fill the table.
    pub async fn mount(&self) -> Result<RefreshOutcome, DomainError> {
        let outcome = self.adapter.load_initial(self.controller.scope()).await;
        self.controller.mount()?;
        Ok(outcome)
    }

    pub async fn unmount(&self) {
        self.controller.unmount().await;
    }

    /// Manual re-fetch outside the event path.
    pub async fn reload(&self) -> Result<RefreshOutcome, DomainError> {
        self.adapter.fetch_and_replace(self.controller.scope()).await
    }

    /// Render the current page, first adopting the newest record set.
    pub fn render(&mut self) -> GridView {
        self.sync_records();
        self.grid.render()
    }

    /// Adopts the store's snapshot if it changed since the last call.
    /// Returns whether the grid's records were replaced.
    pub fn sync_records(&mut self) -> bool {
        let snapshot = self.store.snapshot();
        if self.seen_version == Some(snapshot.version) {
            return false;
        }
        self.grid.set_records(snapshot.records);
        self.seen_version = Some(snapshot.version);
        true
    }

    pub fn grid(&self) -> &DataGrid<T> {
        &self.grid
    }

    /// Mutable grid access for search and paging.
    pub fn grid_mut(&mut self) -> &mut DataGrid<T> {
        &mut self.grid
    }

    pub fn store(&self) -> &Arc<RecordStore<T>> {
        &self.store
    }

    pub fn controller(&self) -> &LiveSyncController {
        &self.controller
    }

    pub fn sync_state(&self) -> SyncState {
        self.controller.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryChannelHub, InMemoryRowSource};
    use crate::config::LiveSyncConfig;
    use crate::domain::grid::ColumnDescriptor;
    use crate::domain::sync::ChannelEvent;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct Lead {
        id: String,
        name: String,
    }

    fn lead(id: u32, name: &str) -> Lead {
        Lead {
            id: format!("L-{}", id),
            name: name.to_string(),
        }
    }

    fn dashboard(
        source: InMemoryRowSource<Lead>,
        hub: &Arc<InMemoryChannelHub>,
    ) -> LiveDashboard<Lead> {
        let grid = DataGrid::new(
            Vec::new(),
            vec![
                ColumnDescriptor::field("ID", "id"),
                ColumnDescriptor::field("Name", "name"),
            ],
            |lead: &Lead| lead.id.clone(),
        );
        let config = AppConfig {
            live_sync: LiveSyncConfig::default().with_endpoint("memory://hub"),
            ..Default::default()
        };
        LiveDashboard::new(
            grid,
            Arc::new(source),
            hub.clone(),
            &config,
            "leads",
            &["lead-update", "status-change"],
        )
    }

    #[tokio::test]
    async fn mount_loads_records_before_going_live() {
        let hub = Arc::new(InMemoryChannelHub::new());
        let mut dashboard = dashboard(
            InMemoryRowSource::new(vec![lead(1, "Ada"), lead(2, "Grace")]),
            &hub,
        );

        let outcome = dashboard.mount().await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Applied { version: 1, count: 2 });
        assert_eq!(dashboard.render().row_keys(), vec!["L-1", "L-2"]);
        dashboard.unmount().await;
    }

    #[tokio::test]
    async fn event_refresh_reaches_the_grid_on_next_render() {
        let hub = Arc::new(InMemoryChannelHub::new());
        let source = InMemoryRowSource::new(vec![lead(1, "Ada")]);
        let mut dashboard = dashboard(source.clone(), &hub);
        dashboard.mount().await.unwrap();
        dashboard
            .controller()
            .state_changes()
            .wait_for(|state| *state == SyncState::Subscribed)
            .await
            .unwrap();
        let mut records = dashboard.store().subscribe();
        records.borrow_and_update();

        source.set_records(vec![lead(1, "Ada"), lead(3, "Linus")]);
        hub.publish("leads", ChannelEvent::named("status-change"));
        records.changed().await.unwrap();

        assert_eq!(dashboard.render().row_keys(), vec!["L-1", "L-3"]);
        dashboard.unmount().await;
    }

    #[tokio::test]
    async fn sync_records_only_replaces_on_new_version() {
        let hub = Arc::new(InMemoryChannelHub::new());
        let mut dashboard = dashboard(InMemoryRowSource::new(vec![lead(1, "Ada")]), &hub);

        assert!(dashboard.sync_records());
        assert!(!dashboard.sync_records());

        dashboard.reload().await.unwrap();
        assert!(dashboard.sync_records());
        assert_eq!(dashboard.grid().records().len(), 1);
    }
}
