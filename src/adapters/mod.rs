//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `row_source` - Record collection fetchers (HTTP, in-memory)
//! - `channel` - Push channel transports (in-memory hub)

pub mod channel;
pub mod row_source;

pub use channel::{InMemoryChannel, InMemoryChannelHub};
pub use row_source::{decode_collection, HttpRowSource, InMemoryRowSource, ScriptedFetch};
