//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Row source errors
    FetchFailed,
    DecodeFailed,

    // Channel errors
    ChannelConnectFailed,
    ChannelTimeout,
    ChannelClosed,
    SubscribeFailed,

    // Lifecycle errors
    InvalidStateTransition,
    ViewUnmounted,

    // Infrastructure errors
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::DecodeFailed => "DECODE_FAILED",
            ErrorCode::ChannelConnectFailed => "CHANNEL_CONNECT_FAILED",
            ErrorCode::ChannelTimeout => "CHANNEL_TIMEOUT",
            ErrorCode::ChannelClosed => "CHANNEL_CLOSED",
            ErrorCode::SubscribeFailed => "SUBSCRIBE_FAILED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ViewUnmounted => "VIEW_UNMOUNTED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a fetch failure for the named row source.
    pub fn fetch_failed(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::FetchFailed, message).with_detail("source", source.into())
    }

    /// Creates a channel connect failure for the given endpoint.
    pub fn connect_failed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ChannelConnectFailed, message).with_detail("endpoint", endpoint.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
