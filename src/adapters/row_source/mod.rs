//! Row source adapters.
//!
//! - `HttpRowSource` - REST collection endpoint over `reqwest`
//! - `InMemoryRowSource` - Mock data with scripted outcomes for tests

mod http;
mod in_memory;

pub use http::{decode_collection, HttpRowSource};
pub use in_memory::{InMemoryRowSource, ScriptedFetch};
