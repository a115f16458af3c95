// src/fetch/fixture.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::JsonFetcher;
use crate::error::{FetchError, Result};

/// In-memory fetcher: canned responses keyed by URL. Records every URL it is
/// asked for, in order, so tests can assert which stages ran.
#[derive(Default)]
pub struct FixtureFetcher {
    responses: Mutex<HashMap<String, Result<serde_json::Value>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, url: &str, body: serde_json::Value) -> Self {
        self.set(url, Ok(body));
        self
    }

    /// Parse `raw` as JSON; a fixture that is not JSON is a test bug.
    pub fn with_raw(self, url: &str, raw: &str) -> Self {
        let parsed = serde_json::from_str(raw)
            .map_err(|e| FetchError::malformed("fixture is not JSON", e));
        self.set(url, parsed);
        self
    }

    pub fn with_error(self, url: &str, err: FetchError) -> Self {
        self.set(url, Err(err));
        self
    }

    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .expect("fixture mutex poisoned")
            .insert(url.to_string(), delay);
        self
    }

    /// Replace the canned response for `url` (e.g. between poller ticks).
    pub fn set(&self, url: &str, res: Result<serde_json::Value>) {
        self.responses
            .lock()
            .expect("fixture mutex poisoned")
            .insert(url.to_string(), res);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("fixture mutex poisoned").clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .expect("fixture mutex poisoned")
            .iter()
            .filter(|c| c.as_str() == url)
            .count()
    }
}

#[async_trait]
impl JsonFetcher for FixtureFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        self.calls
            .lock()
            .expect("fixture mutex poisoned")
            .push(url.to_string());

        let delay = self
            .delays
            .lock()
            .expect("fixture mutex poisoned")
            .get(url)
            .copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }

        self.responses
            .lock()
            .expect("fixture mutex poisoned")
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    status: 404,
                    url: url.to_string(),
                })
            })
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
