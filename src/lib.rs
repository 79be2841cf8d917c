//! Ops Console - shared core behind the operations dashboards.
//!
//! Two collaborating pieces carry every dashboard table:
//!
//! - [`domain::grid::DataGrid`] - search, pagination and column rendering
//!   over an arbitrary record type
//! - [`application::LiveSyncController`] - one realtime channel per mounted
//!   view, turning named server events into wholesale re-fetches
//!
//! [`application::LiveDashboard`] composes them with a row source.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
