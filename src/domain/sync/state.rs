//! Live sync lifecycle.
//!
//! ```text
//! Disconnected ──mount──▶ Connecting ──handshake──▶ Subscribed
//!      │                      │                        │
//!      │                      └──connect failed──▶ Disconnected (paused)
//!      │                                               │
//!      └──────────────── unmount (any state) ─────────▶ Closed
//! ```
//!
//! `Closed` is the terminal disconnected state: nothing leaves it.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// No channel. Initial state, and the state realtime falls back to
    /// after a connect failure or transport closure.
    Disconnected,
    /// Connection attempt in flight.
    Connecting,
    /// Handshake sent and listeners registered.
    Subscribed,
    /// View unmounted; listeners deregistered and channel closed.
    Closed,
}

impl SyncState {
    /// True while inbound events may still trigger refreshes.
    pub fn is_live(&self) -> bool {
        matches!(self, SyncState::Subscribed)
    }
}

impl StateMachine for SyncState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SyncState::*;
        matches!(
            (self, target),
            (Disconnected, Connecting)
                | (Connecting, Subscribed)
                | (Connecting, Disconnected)
                | (Subscribed, Disconnected)
                | (Disconnected, Closed)
                | (Connecting, Closed)
                | (Subscribed, Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SyncState::*;
        match self {
            Disconnected => vec![Connecting, Closed],
            Connecting => vec![Subscribed, Disconnected, Closed],
            Subscribed => vec![Disconnected, Closed],
            Closed => vec![],
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncState::Disconnected => "disconnected",
            SyncState::Connecting => "connecting",
            SyncState::Subscribed => "subscribed",
            SyncState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}
