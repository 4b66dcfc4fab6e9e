//! Client code for leadscout.
//!
//! This crate provides the page fetcher, URL normalization, email and title
//! extraction, site harvesting, liveness checks, search scraping and the LLM
//! collaborator client used by the server.

pub mod extract;
pub mod fetch;
pub mod harvest;
pub mod llm;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;

pub use extract::{clean_email, extract_emails, extract_title};
pub use fetch::{FetchConfig, FetchError, FetchResponse, Fetcher, HttpFetcher, Method, normalize};
pub use harvest::{HarvestOptions, Harvester, LivenessFilter, SiteHarvest};
pub use llm::{ChatClient, ChatConfig, LlmError, Suggester};
pub use search::{DuckDuckGo, SearchEngine};
