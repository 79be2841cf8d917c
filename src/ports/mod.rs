//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! - `RowSource` - Fetches a table's full record collection
//! - `ChannelConnector` / `ChannelHandle` / `ChannelListener` - Push channel transport
//! - `RefreshAction` - Work triggered by an inbound channel event

mod channel;
mod refresh_action;
mod row_source;

pub use channel::{ChannelConnector, ChannelHandle, ChannelListener};
pub use refresh_action::RefreshAction;
pub use row_source::RowSource;
