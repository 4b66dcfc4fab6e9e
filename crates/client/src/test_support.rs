//! Scripted collaborators for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::fetch::{FetchError, FetchResponse, Fetcher, Method};

type Reply = Result<(u16, String), FetchError>;

/// [`Fetcher`] that answers from a table and records every call.
///
/// Unscripted requests fail with a network error.
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: HashMap<(Method, String), Reply>,
    calls: Mutex<Vec<(Method, String)>>,
    count: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.replies.insert((Method::Get, url.to_string()), Ok((status, body.to_string())));
        self
    }

    pub fn head(mut self, url: &str, status: u16) -> Self {
        self.replies.insert((Method::Head, url.to_string()), Ok((status, String::new())));
        self
    }

    pub fn fail(mut self, method: Method, url: &str, err: FetchError) -> Self {
        self.replies.insert((method, url.to_string()), Err(err));
        self
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(_, u)| u == url).count()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, method: Method, _timeout: Duration) -> Result<FetchResponse, FetchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push((method, url.to_string()));

        match self.replies.get(&(method, url.to_string())) {
            Some(Ok((status, body))) => Ok(FetchResponse {
                url: url.to_string(),
                final_url: url.to_string(),
                status: *status,
                body: body.clone(),
                fetch_ms: 0,
            }),
            Some(Err(e)) => Err(e.clone()),
            None => Err(FetchError::Network(format!("no route to {url}"))),
        }
    }
}
