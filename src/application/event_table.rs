//! Declarative mapping from channel event names to refresh actions.
//!
//! Dashboards typically listen for several server events that all demand
//! the same "re-fetch everything" response:
//!
//! ```ignore
//! let table = EventTable::new()
//!     .on_all(["queue-update", "call-update", "status-change"], refresh.clone());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::ports::RefreshAction;

/// Ordered `{event name -> refresh action}` table.
///
/// Event names are opaque strings; registering a name twice replaces the
/// earlier action but keeps the original position.
#[derive(Clone, Default)]
pub struct EventTable {
    entries: Vec<(String, Arc<dyn RefreshAction>)>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `event_name` to `action`.
    pub fn on(mut self, event_name: impl Into<String>, action: Arc<dyn RefreshAction>) -> Self {
        let event_name = event_name.into();
        match self.entries.iter_mut().find(|(name, _)| *name == event_name) {
            Some(entry) => entry.1 = action,
            None => self.entries.push((event_name, action)),
        }
        self
    }

    /// Binds every name in `event_names` to the same `action`.
    pub fn on_all<I, S>(self, event_names: I, action: Arc<dyn RefreshAction>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        event_names
            .into_iter()
            .fold(self, |table, name| table.on(name, Arc::clone(&action)))
    }

    pub fn action_for(&self, event_name: &str) -> Option<&Arc<dyn RefreshAction>> {
        self.entries
            .iter()
            .find(|(name, _)| name == event_name)
            .map(|(_, action)| action)
    }

    /// Registered names in declaration order.
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for EventTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(name, action)| (name, action.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::domain::sync::ViewScope;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl RefreshAction for Named {
        async fn refresh(&self, _scope: &ViewScope) -> Result<(), DomainError> {
            Ok(())
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn on_all_maps_every_name_to_the_same_action() {
        let action: Arc<dyn RefreshAction> = Arc::new(Named("refetch"));
        let table = EventTable::new().on_all(
            ["queue-update", "call-update", "status-change"],
            Arc::clone(&action),
        );

        assert_eq!(table.len(), 3);
        for name in ["queue-update", "call-update", "status-change"] {
            assert!(Arc::ptr_eq(table.action_for(name).unwrap(), &action));
        }
    }

    #[test]
    fn unknown_name_has_no_action() {
        let table = EventTable::new().on("lead-update", Arc::new(Named("leads")));
        assert!(table.action_for("ticket-update").is_none());
    }

    #[test]
    fn rebinding_replaces_action_and_keeps_order() {
        let table = EventTable::new()
            .on("a", Arc::new(Named("first")))
            .on("b", Arc::new(Named("other")))
            .on("a", Arc::new(Named("second")));

        assert_eq!(table.event_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.action_for("a").unwrap().name(), "second");
    }

    #[test]
    fn empty_table() {
        let table = EventTable::new();
        assert!(table.is_empty());
        assert_eq!(format!("{:?}", table), "{}");
    }
}
