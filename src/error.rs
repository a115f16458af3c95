// src/error.rs
use thiserror::Error;

/// Failures a screen can run into while talking to an upstream API.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Connection refused, DNS, TLS, timeout, body read error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Body was not the shape we expected (missing close-approach data etc.).
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Numerically unusable input, e.g. a zero miss distance.
    #[error("degenerate input: {0}")]
    Degenerate(String),
}

impl FetchError {
    pub fn malformed(ctx: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        FetchError::Malformed(format!("{ctx}: {err}"))
    }
}

/// reqwest puts the full request URL into its error text; the query is
/// dropped here so API keys never reach logs, screens or webhooks.
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return FetchError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| redact_query(u.as_str())).unwrap_or_default(),
            };
        }
        let e = e.without_url();
        if e.is_decode() {
            return FetchError::Malformed(e.to_string());
        }
        FetchError::Transport(e.to_string())
    }
}

/// Strip the query string of a URL before it is logged or shown.
pub(crate) fn redact_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?…"),
        None => url.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
