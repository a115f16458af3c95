// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use space_stuff::config::{AppConfig, Endpoints};
use space_stuff::fetch::FixtureFetcher;
use space_stuff::notify::{Notification, Notifier, NotifierMux};
use space_stuff::screens::ScreenDeps;

pub const NEO_URL: &str = "http://fixtures.test/neo?api_key=TEST";
pub const ISS_URL: &str = "http://fixtures.test/iss";
pub const ARTICLES_URL: &str = "http://fixtures.test/articles";
pub const REPORTS_URL: &str = "http://fixtures.test/reports";
pub const BLOGS_URL: &str = "http://fixtures.test/blogs";

pub const NEO_FEED: &str = include_str!("../fixtures/neo_feed.json");
pub const ISS: &str = include_str!("../fixtures/iss.json");
pub const ARTICLES: &str = include_str!("../fixtures/articles.json");
pub const REPORTS: &str = include_str!("../fixtures/reports.json");
pub const BLOGS: &str = include_str!("../fixtures/blogs.json");

pub fn test_config() -> AppConfig {
    AppConfig {
        endpoints: Endpoints {
            neo_feed: "http://fixtures.test/neo".into(),
            iss: ISS_URL.into(),
            articles: ARTICLES_URL.into(),
            reports: REPORTS_URL.into(),
            blogs: BLOGS_URL.into(),
        },
        nasa_api_key: "TEST".into(),
        iss_refresh_secs: 5,
        ..AppConfig::default()
    }
}

/// Every endpoint answers with its fixture.
pub fn all_fixtures() -> FixtureFetcher {
    FixtureFetcher::new()
        .with_raw(NEO_URL, NEO_FEED)
        .with_raw(ISS_URL, ISS)
        .with_raw(ARTICLES_URL, ARTICLES)
        .with_raw(REPORTS_URL, REPORTS)
        .with_raw(BLOGS_URL, BLOGS)
}

/// Notifications go to the log only; cooldown 0 so every failure is sent.
pub fn deps(fetcher: Arc<FixtureFetcher>) -> ScreenDeps {
    deps_with(test_config(), fetcher)
}

pub fn deps_with(config: AppConfig, fetcher: Arc<FixtureFetcher>) -> ScreenDeps {
    ScreenDeps {
        config: Arc::new(config),
        fetcher,
        notifier: Arc::new(NotifierMux::new(
            vec![Box::new(space_stuff::notify::LogNotifier)],
            0,
        )),
    }
}

/// Keeps every notification that reached it, in order.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn screens(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|n| n.screen.clone()).collect()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, n: &Notification) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(n.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Like `deps`, but notifications land in the returned recorder behind the
/// given cooldown.
pub fn deps_recording(
    fetcher: Arc<FixtureFetcher>,
    cooldown_secs: i64,
) -> (ScreenDeps, RecordingNotifier) {
    let rec = RecordingNotifier::default();
    let deps = ScreenDeps {
        config: Arc::new(test_config()),
        fetcher,
        notifier: Arc::new(NotifierMux::new(vec![Box::new(rec.clone())], cooldown_secs)),
    };
    (deps, rec)
}
