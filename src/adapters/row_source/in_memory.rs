//! In-memory row source for mock data and tests.
//!
//! Serves a fixed record set, optionally preceded by scripted responses
//! (records or failures), each with its own simulated latency.
//!
//! # Example
//!
//! ```ignore
//! let source = InMemoryRowSource::new(sample_leads())
//!     .with_records_after(Duration::from_millis(50), updated_leads())
//!     .with_failure("upstream 502");
//!
//! source.fetch_records().await?; // updated_leads after 50ms
//! source.fetch_records().await;  // Err(FetchFailed)
//! source.fetch_records().await?; // sample_leads
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::DomainError;
use crate::ports::RowSource;

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum ScriptedFetch<T> {
    Records { records: Vec<T>, delay: Duration },
    Failure { message: String, delay: Duration },
}

/// Record source held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryRowSource<T> {
    name: String,
    records: Arc<Mutex<Vec<T>>>,
    script: Arc<Mutex<VecDeque<ScriptedFetch<T>>>>,
    calls: Arc<Mutex<usize>>,
}

impl<T: Clone> InMemoryRowSource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            name: "in-memory".to_string(),
            records: Arc::new(Mutex::new(records)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Queues a response that resolves after `delay`.
    pub fn with_records_after(self, delay: Duration, records: Vec<T>) -> Self {
        self.push(ScriptedFetch::Records { records, delay });
        self
    }

    /// Queues an immediate failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(ScriptedFetch::Failure {
            message: message.into(),
            delay: Duration::ZERO,
        });
        self
    }

    /// Queues a scripted outcome on a shared source.
    pub fn push(&self, fetch: ScriptedFetch<T>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(fetch);
    }

    /// Replaces the fallback record set served once the script is drained.
    pub fn set_records(&self, records: Vec<T>) {
        *self.records.lock().unwrap_or_else(PoisonError::into_inner) = records;
    }

    /// Number of fetches started so far.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_fetch(&self) -> Option<ScriptedFetch<T>> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

#[async_trait]
impl<T> RowSource<T> for InMemoryRowSource<T>
where
    T: Clone + Send + 'static,
{
    async fn fetch_records(&self) -> Result<Vec<T>, DomainError> {
        *self.calls.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        match self.next_fetch() {
            Some(ScriptedFetch::Records { records, delay }) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Ok(records)
            }
            Some(ScriptedFetch::Failure { message, delay }) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Err(DomainError::fetch_failed(&self.name, message))
            }
            None => Ok(self
                .records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn serves_fallback_records_without_script() {
        let source = InMemoryRowSource::new(vec![1, 2, 3]);
        assert_eq!(source.fetch_records().await.unwrap(), vec![1, 2, 3]);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn script_is_consumed_in_order_then_falls_back() {
        let source = InMemoryRowSource::new(vec![0])
            .with_name("calls/queue")
            .with_records_after(Duration::ZERO, vec![7, 8])
            .with_failure("upstream 502");

        assert_eq!(source.fetch_records().await.unwrap(), vec![7, 8]);
        let err = source.fetch_records().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::FetchFailed);
        assert_eq!(err.details.get("source"), Some(&"calls/queue".to_string()));
        assert_eq!(source.fetch_records().await.unwrap(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_delay_is_honoured() {
        let source = InMemoryRowSource::new(Vec::<u8>::new())
            .with_records_after(Duration::from_secs(3), vec![1]);

        let started = tokio::time::Instant::now();
        source.fetch_records().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn set_records_changes_fallback_for_clones() {
        let source = InMemoryRowSource::new(vec!["a"]);
        let shared = source.clone();
        source.set_records(vec!["b", "c"]);
        assert_eq!(shared.fetch_records().await.unwrap(), vec!["b", "c"]);
    }
}
