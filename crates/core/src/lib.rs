//! Core types and shared functionality for leadscout.
//!
//! This crate provides:
//! - SQLite store for the response cache and lead records
//! - Unified error types
//! - Layered configuration

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use store::{Lead, LeadStore, NewLead, Store};
