//! SQLite-backed persistence for leadscout.
//!
//! Holds two tables behind one async connection:
//!
//! - `response_cache`: content-addressed pipeline responses with TTL and
//!   least-recently-hit eviction
//! - `leads`: lead records searchable by keyword
//!
//! Schema changes ship as numbered SQL migrations.

pub mod connection;
pub mod hash;
pub mod leads;
pub mod migrations;
pub mod responses;

pub use crate::Error;

pub use connection::Store;
pub use hash::compute_cache_key;
pub use leads::{Lead, LeadStore, NewLead};
