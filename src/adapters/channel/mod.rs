//! Push channel adapters.
//!
//! - `InMemoryChannelHub` - in-process transport for tests and mock-data views

mod in_memory;

pub use in_memory::{InMemoryChannel, InMemoryChannelHub};
