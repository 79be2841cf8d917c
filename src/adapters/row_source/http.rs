//! REST row source.
//!
//! Fetches a JSON collection with `GET {base_url}/{path}`. The body may be
//! a bare array or an object carrying the array under `data`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::marker::PhantomData;

use crate::config::RowSourceConfig;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::RowSource;

/// Row source backed by a REST collection endpoint.
pub struct HttpRowSource<T> {
    client: Client,
    url: String,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> HttpRowSource<T> {
    /// Creates a source for `path` under the configured base URL.
    pub fn new(config: &RowSourceConfig, path: &str) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            url: config.collection_url(path),
            name: path.trim_matches('/').to_string(),
            _record: PhantomData,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl<T> RowSource<T> for HttpRowSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_records(&self) -> Result<Vec<T>, DomainError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("Request to {} timed out", self.url)
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    e.to_string()
                };
                DomainError::fetch_failed(&self.name, message)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::fetch_failed(
                &self.name,
                format!("Unexpected status {}: {}", status, body),
            )
            .with_detail("status", status.as_u16().to_string()));
        }

        let body: JsonValue = response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DecodeFailed,
                format!("Failed to parse response body: {}", e),
            )
            .with_detail("source", self.name.clone())
        })?;

        let records = decode_collection(body)?;
        tracing::debug!(source = %self.name, count = records.len(), "Fetched records");
        Ok(records)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Accepts `[...]` or `{"data": [...]}`.
pub fn decode_collection<T: DeserializeOwned>(body: JsonValue) -> Result<Vec<T>, DomainError> {
    let items = match body {
        JsonValue::Array(_) => body,
        JsonValue::Object(mut fields) => match fields.remove("data") {
            Some(data @ JsonValue::Array(_)) => data,
            _ => {
                return Err(DomainError::new(
                    ErrorCode::DecodeFailed,
                    "Expected a JSON array or an object with a 'data' array",
                ))
            }
        },
        _ => {
            return Err(DomainError::new(
                ErrorCode::DecodeFailed,
                "Expected a JSON array or an object with a 'data' array",
            ))
        }
    };

    serde_json::from_value(items).map_err(|e| {
        DomainError::new(
            ErrorCode::DecodeFailed,
            format!("Records did not match the expected shape: {}", e),
        )
    })
}
