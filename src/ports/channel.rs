//! Channel ports - the push-notification transport contract.
//!
//! A view connects to an endpoint, sends a subscribe handshake for its
//! topic, then registers listeners by event name. The transport is
//! responsible for any reconnection policy; callers never retry.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, ListenerId};
use crate::domain::sync::ChannelEvent;

/// Receives events delivered on a channel.
///
/// Called from the transport's delivery context, so implementations
/// should hand the event off rather than doing work inline.
pub trait ChannelListener: Send + Sync {
    /// An event matching the registered name arrived.
    fn on_event(&self, event: ChannelEvent);

    /// The transport lost the channel after it was established.
    fn on_transport_error(&self, _error: DomainError) {}
}

/// Opens channels. One connector may serve many views, but each call to
/// `connect` yields an independent channel.
#[async_trait]
pub trait ChannelConnector: Send + Sync {
    /// Establish a channel to `endpoint`.
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChannelHandle>, DomainError>;
}

/// An established channel, exclusively owned by one live sync controller.
#[async_trait]
pub trait ChannelHandle: Send + Sync {
    /// Send the subscribe handshake for `topic`.
    async fn subscribe(&self, topic: &str) -> Result<(), DomainError>;

    /// Register `listener` for events named `event_name`.
    fn on(&self, event_name: &str, listener: Arc<dyn ChannelListener>) -> ListenerId;

    /// Remove a registration. Unknown ids are ignored.
    fn off(&self, listener_id: ListenerId);

    /// Close the channel. Idempotent.
    async fn close(&self);
}
