//! Row Source Adapter - fetch-and-replace over a `RowSource`.
//!
//! Wraps a fetch contract and the view's `RecordStore`. Both the initial
//! load and every event-driven refresh go through `fetch_and_replace`:
//!
//! 1. Fetch the full collection
//! 2. If the view has unmounted meanwhile, discard the result
//! 3. Otherwise replace the store's record set wholesale
//!
//! A failed fetch leaves the previous record set untouched.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::sync::ViewScope;
use crate::ports::{RefreshAction, RowSource};

use super::record_store::RecordStore;

/// What happened to one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Records replaced; carries the store version and record count.
    Applied { version: u64, count: usize },
    /// The view unmounted before the fetch resolved.
    Discarded,
    /// The fetch failed; the previous set stays displayed.
    Failed,
}

/// Adapter between a `RowSource` and the record store it feeds.
pub struct RowSourceAdapter<T> {
    source: Arc<dyn RowSource<T>>,
    store: Arc<RecordStore<T>>,
    action_name: String,
}

impl<T: Send + Sync + 'static> RowSourceAdapter<T> {
    pub fn new(source: Arc<dyn RowSource<T>>, store: Arc<RecordStore<T>>) -> Self {
        let action_name = format!("refresh:{}", source.name());
        Self {
            source,
            store,
            action_name,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore<T>> {
        &self.store
    }

    /// Initial load on mount. Errors are logged, never returned.
    pub async fn load_initial(&self, scope: &ViewScope) -> RefreshOutcome {
        match self.fetch_and_replace(scope).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    view_id = %scope.view_id(),
                    source = %self.source.name(),
                    error = %error,
                    "Initial load failed; showing empty record set"
                );
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetches and, if the view is still mounted, replaces the record set.
    pub async fn fetch_and_replace(&self, scope: &ViewScope) -> Result<RefreshOutcome, DomainError> {
        let records = self.source.fetch_records().await?;
        let count = records.len();

        // Checked and applied under the scope's guard so an unmount cannot
        // slip in between
        let Some(version) = scope.run_if_active(|| self.store.replace(records)) else {
            tracing::debug!(
                view_id = %scope.view_id(),
                source = %self.source.name(),
                "Discarding fetch that resolved after unmount"
            );
            return Ok(RefreshOutcome::Discarded);
        };

        tracing::debug!(
            view_id = %scope.view_id(),
            source = %self.source.name(),
            version,
            count,
            "Record set replaced"
        );
        Ok(RefreshOutcome::Applied { version, count })
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> RefreshAction for RowSourceAdapter<T> {
    async fn refresh(&self, scope: &ViewScope) -> Result<(), DomainError> {
        self.fetch_and_replace(scope).await.map(|_| ())
    }

    fn name(&self) -> &str {
        &self.action_name
    }
}
