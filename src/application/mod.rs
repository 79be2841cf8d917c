//! Application layer - wiring between the domain and the ports.
//!
//! - `RecordStore` - the record set a view displays, replaced wholesale
//! - `RowSourceAdapter` - fetch-and-replace, used for initial load and refresh
//! - `EventTable` - declarative event name to refresh action mapping
//! - `LiveSyncController` - per-view channel lifecycle
//! - `LiveDashboard` - composition root for one live table view

mod dashboard;
mod event_table;
mod live_sync;
mod record_store;
mod row_source_adapter;

pub use dashboard::LiveDashboard;
pub use event_table::EventTable;
pub use live_sync::LiveSyncController;
pub use record_store::{RecordStore, Snapshot};
pub use row_source_adapter::{RefreshOutcome, RowSourceAdapter};
