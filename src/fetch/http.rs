// src/fetch/http.rs
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use std::time::{Duration, Instant};

use super::JsonFetcher;
use crate::error::{redact_query, FetchError, Result};

/// `reqwest`-backed fetcher. One GET per call; no retry.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_client(client: Client, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let rsp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = rsp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: redact_query(url),
            });
        }
        let bytes = rsp.bytes().await?;
        serde_json::from_slice::<serde_json::Value>(&bytes)
            .map_err(|e| FetchError::malformed("response body is not JSON", e))
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        crate::telemetry::ensure_described();
        counter!("upstream_requests_total").increment(1);
        let t0 = Instant::now();

        let res = self.get_json(url).await;

        histogram!("upstream_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        if let Err(e) = &res {
            counter!("upstream_errors_total").increment(1);
            tracing::warn!(error = %e, url = %redact_query(url), "upstream fetch failed");
        } else {
            tracing::debug!(url = %redact_query(url), "upstream fetch ok");
        }
        res
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
