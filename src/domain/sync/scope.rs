//! Liveness token shared between a mounted view and its in-flight work.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::ViewId;

/// Tells asynchronous work whether its view is still mounted.
///
/// Refreshes are never cancelled; instead a fetch that resolves after
/// unmount checks the scope and discards its result.
#[derive(Debug, Clone)]
pub struct ViewScope {
    view_id: ViewId,
    active: Arc<RwLock<bool>>,
}

impl ViewScope {
    pub fn new(view_id: ViewId) -> Self {
        Self {
            view_id,
            active: Arc::new(RwLock::new(true)),
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn is_active(&self) -> bool {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `apply` only while the view is mounted.
    ///
    /// `deactivate` waits for a running `apply` to finish, so nothing
    /// applied through here can land after `deactivate` returns.
    pub fn run_if_active<R>(&self, apply: impl FnOnce() -> R) -> Option<R> {
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        if *active {
            Some(apply())
        } else {
            None
        }
    }

    /// Marks the view unmounted for every clone of this scope.
    pub fn deactivate(&self) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = false;
    }
}
