//! Shared, I/O-free core of the bookkeeping front-end.
//!
//! - [`model`]: table snapshots and declared column types.
//! - [`classify`]: input control and value parser per declared type.
//! - [`requests`]: request descriptors built from routes, payloads and sessions.
//! - [`responses`]: `{ok, status, body}` envelopes and table validation.
//! - [`table`]: per-table view state and its render projection.
//! - [`config`]: the server base address.

pub mod classify;
pub mod config;
pub mod model;
pub mod requests;
pub mod responses;
pub mod table;
