//! In-process push channel transport.
//!
//! Stands in for the realtime server in tests and mock-data dashboards.
//! Delivery is synchronous: `publish` calls every matching listener before
//! returning, so tests are deterministic.
//!
//! ```text
//! InMemoryChannelHub
//! ├── channel a (topic: calls)    ├── queue-update → listener 1
//! │                               └── status-change → listener 2
//! └── channel b (topic: tickets)  └── ticket-update → listener 3
//! ```
//!
//! Each `connect` yields an independent channel; closing one never
//! touches another.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::watch;

use crate::domain::foundation::{DomainError, ErrorCode, ListenerId};
use crate::domain::sync::ChannelEvent;
use crate::ports::{ChannelConnector, ChannelHandle, ChannelListener};

/// In-memory channel hub.
///
/// Test controls:
/// - `hold_connections` / `release_connections` keep `connect` pending
/// - `fail_next_connect` makes the next `connect` return an error
/// - `drop_all_channels` simulates the transport losing every channel
///
/// # Example
///
/// ```ignore
/// let hub = Arc::new(InMemoryChannelHub::new());
/// let controller = LiveSyncController::new(hub.clone(), config, "calls", table);
/// controller.mount()?;
///
/// hub.publish("calls", ChannelEvent::named("queue-update"));
/// ```
pub struct InMemoryChannelHub {
    channels: RwLock<Vec<Arc<InMemoryChannel>>>,
    connect_failures: Mutex<VecDeque<String>>,
    gate: watch::Sender<bool>,
    connect_attempts: AtomicUsize,
}

impl InMemoryChannelHub {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            channels: RwLock::new(Vec::new()),
            connect_failures: Mutex::new(VecDeque::new()),
            gate,
            connect_attempts: AtomicUsize::new(0),
        }
    }

    // === Delivery ===

    /// Delivers `event` to every listener registered for its name on an
    /// open channel subscribed to `topic`. Returns the number of listeners
    /// invoked.
    pub fn publish(&self, topic: &str, event: ChannelEvent) -> usize {
        // Collect listeners first so no lock is held during delivery
        let listeners: Vec<Arc<dyn ChannelListener>> = self
            .open_channels()
            .iter()
            .filter(|channel| channel.is_subscribed_to(topic))
            .flat_map(|channel| channel.listeners_for(&event.name))
            .collect();

        for listener in &listeners {
            listener.on_event(event.clone());
        }
        listeners.len()
    }

    // === Test controls ===

    /// Keeps subsequent `connect` calls pending until released.
    pub fn hold_connections(&self) {
        self.gate.send_replace(true);
    }

    pub fn release_connections(&self) {
        self.gate.send_replace(false);
    }

    /// Makes the next `connect` fail with `message`.
    pub fn fail_next_connect(&self, message: impl Into<String>) {
        self.connect_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(message.into());
    }

    /// Simulates the transport losing every open channel.
    pub fn drop_all_channels(&self, reason: &str) {
        let channels: Vec<Arc<InMemoryChannel>> = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for channel in channels {
            let listeners = channel.all_listeners();
            channel.shut();
            for listener in listeners {
                listener.on_transport_error(DomainError::new(ErrorCode::ChannelClosed, reason));
            }
        }
    }

    // === Introspection ===

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn open_channel_count(&self) -> usize {
        self.open_channels().len()
    }

    /// Listener registrations across all open channels.
    pub fn listener_count(&self) -> usize {
        self.open_channels()
            .iter()
            .map(|channel| channel.listener_count())
            .sum()
    }

    /// Open channels that completed the handshake for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.open_channels()
            .iter()
            .filter(|channel| channel.is_subscribed_to(topic))
            .count()
    }

    fn open_channels(&self) -> Vec<Arc<InMemoryChannel>> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|channel| !channel.is_closed())
            .cloned()
            .collect()
    }

    fn prune_closed(&self) {
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|channel| !channel.is_closed());
    }

    async fn wait_for_gate(&self) {
        let mut gate = self.gate.subscribe();
        while *gate.borrow_and_update() {
            if gate.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for InMemoryChannelHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelConnector for InMemoryChannelHub {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn ChannelHandle>, DomainError> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate().await;

        let failure = self
            .connect_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(message) = failure {
            return Err(DomainError::connect_failed(endpoint, message));
        }

        self.prune_closed();
        let channel = Arc::new(InMemoryChannel::new(endpoint));
        self.channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&channel));
        Ok(channel)
    }
}

/// One open in-memory channel.
pub struct InMemoryChannel {
    endpoint: String,
    topics: RwLock<HashSet<String>>,
    listeners: RwLock<HashMap<ListenerId, (String, Arc<dyn ChannelListener>)>>,
    closed: AtomicBool,
}

impl InMemoryChannel {
    fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            topics: RwLock::new(HashSet::new()),
            listeners: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn is_subscribed_to(&self, topic: &str) -> bool {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(topic)
    }

    fn listeners_for(&self, event_name: &str) -> Vec<Arc<dyn ChannelListener>> {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        // Sort by id so delivery follows registration order
        let mut matching: Vec<_> = listeners
            .iter()
            .filter(|(_, (name, _))| name == event_name)
            .map(|(id, (_, listener))| (*id, Arc::clone(listener)))
            .collect();
        matching.sort_by_key(|(id, _)| *id);
        matching.into_iter().map(|(_, listener)| listener).collect()
    }

    fn all_listeners(&self) -> Vec<Arc<dyn ChannelListener>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn shut(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.topics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl ChannelHandle for InMemoryChannel {
    async fn subscribe(&self, topic: &str) -> Result<(), DomainError> {
        if self.is_closed() {
            return Err(DomainError::new(
                ErrorCode::ChannelClosed,
                format!("Cannot subscribe to '{}' on a closed channel", topic),
            ));
        }
        self.topics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(topic.to_string());
        Ok(())
    }

    fn on(&self, event_name: &str, listener: Arc<dyn ChannelListener>) -> ListenerId {
        let id = ListenerId::next();
        if !self.is_closed() {
            self.listeners
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(id, (event_name.to_string(), listener));
        }
        id
    }

    fn off(&self, listener_id: ListenerId) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&listener_id);
    }

    async fn close(&self) {
        self.shut();
    }
}
