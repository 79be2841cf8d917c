//! RowSource port - the fetch contract behind every dashboard table.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Supplies the full current collection of records for one table.
///
/// Implementations must be safely re-callable at any time; the live sync
/// layer may invoke `fetch_records` again while a previous call is still
/// pending. Failures are returned, never panicked.
///
/// # Example
///
/// ```ignore
/// struct CallQueueSource { client: reqwest::Client }
///
/// #[async_trait]
/// impl RowSource<QueuedCall> for CallQueueSource {
///     async fn fetch_records(&self) -> Result<Vec<QueuedCall>, DomainError> {
///         // GET /api/calls/queue ...
///     }
///
///     fn name(&self) -> &str {
///         "calls/queue"
///     }
/// }
/// ```
#[async_trait]
pub trait RowSource<T>: Send + Sync {
    /// Fetch the complete, unpaginated record set.
    async fn fetch_records(&self) -> Result<Vec<T>, DomainError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
