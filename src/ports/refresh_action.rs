//! RefreshAction port - what an inbound event triggers.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::sync::ViewScope;

/// Re-fetch-and-replace action bound to one or more event names.
///
/// Implementations should be:
/// - **Idempotent** - a refresh always reflects the latest fetch
/// - **Scope-aware** - results arriving after `scope` deactivates are discarded
///
/// Errors are logged by the caller and otherwise swallowed; the previous
/// record set stays in place.
#[async_trait]
pub trait RefreshAction: Send + Sync {
    async fn refresh(&self, scope: &ViewScope) -> Result<(), DomainError>;

    /// Action name for logging.
    fn name(&self) -> &str;
}
