//! HTTP request handlers.
//!
//! Handlers validate input, run the matching pipeline and map failures to
//! [`ApiError`](crate::error::ApiError) with the caller-facing message.

mod harvest;
mod leads;
mod system;

use leadscout_core::LeadStore;
use std::sync::Arc;

use crate::pipelines::Pipelines;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipelines: Arc<Pipelines>,
    pub leads: Arc<dyn LeadStore>,
}

pub use harvest::{analyze, backlinks, crawl, related_websites, scrape};
pub use leads::search_leads;
pub use system::health;
