//! Live sync domain types: lifecycle state, inbound events and the view
//! liveness scope.

mod event;
mod scope;
mod state;

pub use event::ChannelEvent;
pub use scope::ViewScope;
pub use state::SyncState;
