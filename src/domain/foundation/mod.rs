//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and the error
//! types that both the data grid and the live sync layer speak.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{EventId, ListenerId, ViewId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
