// src/fetch/mod.rs
//! The "fetch(url) -> JSON or error" capability every screen is built on.

pub mod fixture;
pub mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::{FetchError, Result};

pub use fixture::FixtureFetcher;
pub use self::http::HttpFetcher;

#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;

    fn name(&self) -> &'static str;
}

/// Decode an already-fetched JSON value into a typed response.
pub fn decode<T: DeserializeOwned>(what: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| FetchError::malformed(what, e))
}
