//! LiveSyncController - per-view realtime channel lifecycle.
//!
//! Each mounted dashboard view owns exactly one controller, and each
//! controller owns exactly one channel. Nothing is pooled or shared, so one
//! view's unmount never touches another view's channel.
//!
//! ## Lifecycle
//!
//! ```text
//! mount()
//!   │
//!   ▼
//! Connecting ──connect fails / times out──▶ Disconnected (realtime paused)
//!   │
//!   │ subscribe(topic) handshake
//!   │ on(name, listener) for every name in the EventTable
//!   ▼
//! Subscribed ──transport drops channel──▶ Disconnected (realtime paused)
//!   │
//!   │ inbound event ─▶ EventTable lookup ─▶ spawned RefreshAction
//!   ▼
//! unmount() / drop ─▶ off(all listeners) ─▶ close() ─▶ Closed
//! ```
//!
//! ## Failure Semantics
//!
//! Connect and refresh failures are logged and swallowed. There is no
//! retry or backoff; reconnection is the transport's business.
//!
//! ## Ordering
//!
//! Inbound events are dispatched in delivery order. Each one spawns an
//! independent refresh, and an in-flight refresh is never cancelled, so
//! when fetches overlap the record set ends up holding whichever response
//! resolved last.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::LiveSyncConfig;
use crate::domain::foundation::{DomainError, ErrorCode, ListenerId, StateMachine, ViewId};
use crate::domain::sync::{ChannelEvent, SyncState, ViewScope};
use crate::ports::{ChannelConnector, ChannelHandle, ChannelListener, RefreshAction};

use super::event_table::EventTable;

/// Owns one view's channel from mount to unmount.
///
/// # Example
///
/// ```ignore
/// let table = EventTable::new()
///     .on_all(["queue-update", "call-update", "status-change"], refresh);
/// let controller = LiveSyncController::new(connector, config.live_sync, "calls", table);
///
/// controller.mount()?;
/// // ... view is live ...
/// controller.unmount().await;
/// ```
pub struct LiveSyncController {
    session: Arc<Session>,
    shutdown: watch::Sender<bool>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
    mounted: AtomicBool,
}

impl LiveSyncController {
    /// Create a controller for a new view.
    pub fn new(
        connector: Arc<dyn ChannelConnector>,
        config: LiveSyncConfig,
        topic: impl Into<String>,
        table: EventTable,
    ) -> Self {
        Self::with_scope(connector, config, topic, table, ViewScope::new(ViewId::new()))
    }

    /// Create a controller bound to an existing view scope.
    pub fn with_scope(
        connector: Arc<dyn ChannelConnector>,
        config: LiveSyncConfig,
        topic: impl Into<String>,
        table: EventTable,
        scope: ViewScope,
    ) -> Self {
        let (state, _) = watch::channel(SyncState::Disconnected);
        let (shutdown, _) = watch::channel(false);
        Self {
            session: Arc::new(Session {
                connector,
                endpoint: config.endpoint.clone(),
                connect_timeout: config.connect_timeout(),
                topic: topic.into(),
                table,
                scope,
                state,
            }),
            shutdown,
            supervisor: Mutex::new(None),
            mounted: AtomicBool::new(false),
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.session.scope.view_id()
    }

    /// Liveness token handed to every refresh this controller triggers.
    pub fn scope(&self) -> &ViewScope {
        &self.session.scope
    }

    pub fn topic(&self) -> &str {
        &self.session.topic
    }

    pub fn state(&self) -> SyncState {
        *self.session.state.borrow()
    }

    /// Receiver that wakes on every lifecycle transition.
    pub fn state_changes(&self) -> watch::Receiver<SyncState> {
        self.session.state.subscribe()
    }

    /// Start connecting. Returns immediately; progress is observable via
    /// `state_changes`.
    ///
    /// # Errors
    ///
    /// - `ViewUnmounted` if `unmount` already ran
    /// - `InvalidStateTransition` if already mounted
    /// - `InternalError` if called outside a tokio runtime
    pub fn mount(&self) -> Result<(), DomainError> {
        if *self.shutdown.borrow() {
            return Err(DomainError::new(
                ErrorCode::ViewUnmounted,
                "Cannot mount a view that has been unmounted",
            )
            .with_detail("view_id", self.view_id().to_string()));
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Live sync requires a tokio runtime: {}", e),
            )
        })?;

        if self.mounted.swap(true, Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "View is already mounted",
            )
            .with_detail("view_id", self.view_id().to_string()));
        }

        tracing::info!(
            view_id = %self.view_id(),
            endpoint = %self.session.endpoint,
            topic = %self.session.topic,
            events = self.session.table.len(),
            "Mounting live sync"
        );

        let task = runtime.spawn(Arc::clone(&self.session).run(self.shutdown.subscribe()));
        *self
            .supervisor
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(task);
        Ok(())
    }

    /// Tear down: deregister every listener, close the channel and move to
    /// `Closed`. Safe from any state, including mid-connect. Idempotent.
    ///
    /// Refreshes already in flight are not cancelled; their results are
    /// discarded when they resolve.
    pub async fn unmount(&self) {
        self.session.scope.deactivate();
        self.shutdown.send_replace(true);

        let supervisor = self
            .supervisor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match supervisor {
            Some(task) => {
                if let Err(error) = task.await {
                    tracing::error!(
                        view_id = %self.view_id(),
                        error = %error,
                        "Live sync supervisor ended abnormally"
                    );
                }
            }
            None if !self.state().is_terminal() => self.session.transition(SyncState::Closed),
            None => {}
        }
    }
}

impl Drop for LiveSyncController {
    fn drop(&mut self) {
        // The detached supervisor still runs teardown
        self.session.scope.deactivate();
        self.shutdown.send_replace(true);
    }
}

impl std::fmt::Debug for LiveSyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveSyncController")
            .field("view_id", &self.view_id())
            .field("topic", &self.session.topic)
            .field("state", &self.state())
            .finish()
    }
}

/// State shared between the controller and its supervisor task.
struct Session {
    connector: Arc<dyn ChannelConnector>,
    endpoint: String,
    connect_timeout: Duration,
    topic: String,
    table: EventTable,
    scope: ViewScope,
    state: watch::Sender<SyncState>,
}

/// Message from channel listeners to the supervisor.
enum Inbound {
    Event(ChannelEvent),
    TransportLost(DomainError),
}

impl Session {
    async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let view_id = self.scope.view_id();
        self.transition(SyncState::Connecting);

        let connect = tokio::time::timeout(
            self.connect_timeout,
            self.connector.connect(&self.endpoint),
        );
        let channel = tokio::select! {
            biased;
            _ = shutdown_requested(&mut shutdown) => {
                tracing::debug!(%view_id, "Unmounted while connecting; abandoning attempt");
                self.transition(SyncState::Closed);
                return;
            }
            result = connect => match result {
                Ok(Ok(channel)) => channel,
                Ok(Err(error)) => {
                    tracing::warn!(
                        %view_id,
                        endpoint = %self.endpoint,
                        error = %error,
                        "Channel connect failed; realtime paused"
                    );
                    return self.pause_until_unmount(&mut shutdown).await;
                }
                Err(_) => {
                    let error = connect_timed_out(&self.endpoint, self.connect_timeout);
                    tracing::warn!(
                        %view_id,
                        error = %error,
                        "Channel connect timed out; realtime paused"
                    );
                    return self.pause_until_unmount(&mut shutdown).await;
                }
            }
        };

        if *shutdown.borrow() {
            channel.close().await;
            self.transition(SyncState::Closed);
            return;
        }

        if let Err(error) = channel.subscribe(&self.topic).await {
            let error = subscribe_failed(&self.topic, error);
            tracing::warn!(
                %view_id,
                error = %error,
                details = ?error.details,
                "Subscribe handshake failed; realtime paused"
            );
            channel.close().await;
            return self.pause_until_unmount(&mut shutdown).await;
        }

        if *shutdown.borrow() {
            channel.close().await;
            self.transition(SyncState::Closed);
            return;
        }

        let (tx, mut inbound) = mpsc::unbounded_channel();
        let listener: Arc<dyn ChannelListener> = Arc::new(Forwarder {
            scope: self.scope.clone(),
            tx,
        });
        let registrations: Vec<ListenerId> = self
            .table
            .event_names()
            .map(|name| channel.on(name, Arc::clone(&listener)))
            .collect();
        drop(listener);

        self.transition(SyncState::Subscribed);
        tracing::info!(
            %view_id,
            topic = %self.topic,
            listeners = registrations.len(),
            "Live sync subscribed"
        );

        let mut events_open = true;
        loop {
            tokio::select! {
                biased;
                _ = shutdown_requested(&mut shutdown) => break,
                message = inbound.recv(), if events_open => match message {
                    Some(Inbound::Event(event)) => self.dispatch(event),
                    Some(Inbound::TransportLost(error)) => {
                        if self.state.borrow().is_live() {
                            tracing::warn!(%view_id, error = %error, "Channel lost; realtime paused");
                        }
                        self.transition(SyncState::Disconnected);
                    }
                    None => events_open = false,
                },
            }
        }

        self.teardown(channel.as_ref(), registrations).await;
    }

    async fn teardown(&self, channel: &dyn ChannelHandle, registrations: Vec<ListenerId>) {
        let count = registrations.len();
        for id in registrations {
            channel.off(id);
        }
        channel.close().await;
        self.transition(SyncState::Closed);
        tracing::info!(
            view_id = %self.scope.view_id(),
            listeners = count,
            "Live sync torn down"
        );
    }

    async fn pause_until_unmount(&self, shutdown: &mut watch::Receiver<bool>) {
        self.transition(SyncState::Disconnected);
        shutdown_requested(shutdown).await;
        self.transition(SyncState::Closed);
    }

    fn dispatch(&self, event: ChannelEvent) {
        if !self.scope.is_active() {
            return;
        }
        let Some(action) = self.table.action_for(&event.name).cloned() else {
            tracing::debug!(
                view_id = %self.scope.view_id(),
                event = %event.name,
                "No refresh bound to event"
            );
            return;
        };

        tracing::debug!(
            view_id = %self.scope.view_id(),
            event = %event.name,
            event_id = %event.event_id,
            action = %action.name(),
            "Dispatching refresh"
        );

        let scope = self.scope.clone();
        tokio::spawn(async move {
            if let Err(error) = action.refresh(&scope).await {
                tracing::warn!(
                    view_id = %scope.view_id(),
                    action = %action.name(),
                    error = %error,
                    "Refresh failed; keeping last record set"
                );
            }
        });
    }

    /// Applies `target` if the lifecycle allows it. Invalid transitions are
    /// logged and ignored; repeating the current state is a no-op.
    fn transition(&self, target: SyncState) {
        let view_id = self.scope.view_id();
        self.state.send_if_modified(|current| {
            if *current == target {
                return false;
            }
            match current.transition_to(target) {
                Ok(next) => {
                    tracing::debug!(%view_id, from = %current, to = %next, "Sync state changed");
                    *current = next;
                    true
                }
                Err(error) => {
                    tracing::warn!(%view_id, error = %error, "Ignoring invalid sync state transition");
                    false
                }
            }
        });
    }
}

/// Listener registered on the channel. Hands events to the supervisor.
struct Forwarder {
    scope: ViewScope,
    tx: mpsc::UnboundedSender<Inbound>,
}

impl ChannelListener for Forwarder {
    fn on_event(&self, event: ChannelEvent) {
        if !self.scope.is_active() {
            return;
        }
        // Only fails once the supervisor has stopped receiving
        let _ = self.tx.send(Inbound::Event(event));
    }

    fn on_transport_error(&self, error: DomainError) {
        let _ = self.tx.send(Inbound::TransportLost(error));
    }
}

fn connect_timed_out(endpoint: &str, timeout: Duration) -> DomainError {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    DomainError::new(
        ErrorCode::ChannelTimeout,
        format!("Channel connect timed out after {}ms", timeout_ms),
    )
    .with_detail("endpoint", endpoint)
}

fn subscribe_failed(topic: &str, cause: DomainError) -> DomainError {
    DomainError::new(
        ErrorCode::SubscribeFailed,
        format!("Subscribe handshake failed: {}", cause.message),
    )
    .with_detail("topic", topic)
    .with_detail("cause", cause.code.to_string())
}

/// Resolves once shutdown is signalled or the controller is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
