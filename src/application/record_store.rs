//! RecordStore - the record set a dashboard view displays.
//!
//! There is one writer (the refresh path) and any number of readers (the
//! grid's render pass, tests). Every write replaces the whole set; nothing
//! is ever merged or mutated in place.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Immutable view of the store at one version.
pub struct Snapshot<T> {
    /// Bumped on every replacement. Starts at 0 for the initial set.
    pub version: u64,
    pub records: Arc<[T]>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.version)
            .field("len", &self.records.len())
            .finish()
    }
}

/// Wholesale-replaced record set with change notification.
pub struct RecordStore<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T> RecordStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Creates a store seeded with `records` at version 0.
    pub fn with_records(records: impl Into<Arc<[T]>>) -> Self {
        let (tx, _) = watch::channel(Snapshot {
            version: 0,
            records: records.into(),
        });
        Self { tx }
    }

    /// Replaces the whole record set and returns the new version.
    pub fn replace(&self, records: impl Into<Arc<[T]>>) -> u64 {
        let records = records.into();
        let mut version = 0;
        self.tx.send_modify(|snapshot| {
            snapshot.version += 1;
            snapshot.records = records;
            version = snapshot.version;
        });
        version
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    pub fn records(&self) -> Arc<[T]> {
        Arc::clone(&self.tx.borrow().records)
    }

    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receiver that wakes on every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("snapshot", &*self.tx.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_empty_at_version_zero() {
        let store: RecordStore<u32> = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn replace_swaps_the_whole_set_and_bumps_version() {
        let store = RecordStore::with_records(vec![1, 2, 3]);
        let before = store.records();

        let version = store.replace(vec![9]);

        assert_eq!(version, 1);
        assert_eq!(&*store.records(), &[9]);
        // Readers holding the old snapshot are unaffected
        assert_eq!(&*before, &[1, 2, 3]);
    }

    #[tokio::test]
    async fn subscribers_observe_replacements() {
        let store = RecordStore::with_records(vec!["a"]);
        let mut rx = store.subscribe();

        store.replace(vec!["b", "c"]);

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.version, 1);
        assert_eq!(&*snapshot.records, &["b", "c"]);
    }

    #[test]
    fn versions_are_monotonic() {
        let store = RecordStore::new();
        let versions: Vec<u64> = (0..5).map(|i| store.replace(vec![i])).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
    }
}
