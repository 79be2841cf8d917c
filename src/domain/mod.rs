//! Domain layer containing the grid engine and live sync types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine)
//! - `grid` - Search, pagination and column rendering over opaque records
//! - `sync` - Live sync lifecycle, channel events and view scope

pub mod foundation;
pub mod grid;
pub mod sync;
