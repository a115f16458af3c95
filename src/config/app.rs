// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::neo::threat::DegeneratePolicy;

pub const ENV_CONFIG_PATH: &str = "SPACE_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/space.toml";

const ENV_NASA_API_KEY: &str = "NASA_API_KEY";
const ENV_ISS_REFRESH_SECS: &str = "ISS_REFRESH_SECS";
const NASA_DEMO_KEY: &str = "DEMO_KEY";

fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_iss_refresh_secs() -> u64 {
    5
}
fn default_request_timeout_secs() -> u64 {
    15
}
fn default_notify_cooldown_secs() -> i64 {
    60
}
fn default_top_n() -> usize {
    5
}

/// Upstream endpoints. The news URLs are list endpoints that return either a
/// bare JSON array or a paginated `{ "results": [...] }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Endpoints {
    pub neo_feed: String,
    pub iss: String,
    pub articles: String,
    pub reports: String,
    pub blogs: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            neo_feed: "https://api.nasa.gov/neo/rest/v1/feed".into(),
            iss: "https://api.wheretheiss.at/v1/satellites/25544".into(),
            articles: "https://api.spaceflightnewsapi.net/v4/articles/".into(),
            reports: "https://api.spaceflightnewsapi.net/v4/reports/".into(),
            blogs: "https://api.spaceflightnewsapi.net/v4/blogs/".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub endpoints: Endpoints,
    /// "ENV" means: read from NASA_API_KEY, falling back to NASA's DEMO_KEY.
    #[serde(default = "default_api_key")]
    pub nasa_api_key: String,
    #[serde(default = "default_iss_refresh_secs")]
    pub iss_refresh_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
    #[serde(default = "default_notify_cooldown_secs")]
    pub notify_cooldown_secs: i64,
    /// How many asteroids the ranking keeps.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            nasa_api_key: default_api_key(),
            iss_refresh_secs: default_iss_refresh_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            degenerate_policy: DegeneratePolicy::default(),
            notify_cooldown_secs: default_notify_cooldown_secs(),
            top_n: default_top_n(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit TOML file, then resolve env-dependent fields.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let cfg: AppConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        cfg.resolved()
            .validated()
            .with_context(|| format!("checking {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $SPACE_CONFIG_PATH
    /// 2) config/space.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        Self::default().resolved().validated()
    }

    /// Every endpoint must be an absolute URL; a bad one fails at startup
    /// instead of on first fetch.
    fn validated(self) -> Result<Self> {
        let ep = &self.endpoints;
        for (name, url) in [
            ("neo_feed", &ep.neo_feed),
            ("iss", &ep.iss),
            ("articles", &ep.articles),
            ("reports", &ep.reports),
            ("blogs", &ep.blogs),
        ] {
            reqwest::Url::parse(url).with_context(|| format!("endpoints.{name} = {url:?}"))?;
        }
        self.neo_feed_url()?;
        Ok(self)
    }

    fn resolved(mut self) -> Self {
        if self.nasa_api_key.trim().eq_ignore_ascii_case("env") {
            self.nasa_api_key = env::var(ENV_NASA_API_KEY)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| NASA_DEMO_KEY.to_string());
        }

        if let Some(secs) = env::var(ENV_ISS_REFRESH_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.iss_refresh_secs = secs;
        }

        // Sanitize
        if self.iss_refresh_secs == 0 {
            self.iss_refresh_secs = default_iss_refresh_secs();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.top_n == 0 {
            self.top_n = default_top_n();
        }
        self
    }

    /// NEO feed URL with the API key attached as a query parameter.
    pub fn neo_feed_url(&self) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoints.neo_feed,
            &[("api_key", self.nasa_api_key.as_str())],
        )
        .with_context(|| format!("invalid NEO feed url {}", self.endpoints.neo_feed))?;
        Ok(url.to_string())
    }
}
