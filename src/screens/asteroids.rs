// src/screens/asteroids.rs
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{to_view, ScreenController, ScreenDeps};
use crate::error::{FetchError, Result};
use crate::neo::{rank_threats, NeoFeed, ScoredNeo};
use crate::notify::Notification;
use crate::screen::{LoadTicket, Screen, ScreenState};

pub const KEY: &str = "asteroids";

/// Top-N near-Earth objects by threat score.
pub struct AsteroidsScreen {
    screen: Screen<Vec<ScoredNeo>>,
    deps: ScreenDeps,
}

impl AsteroidsScreen {
    pub fn new(deps: ScreenDeps) -> Self {
        Self {
            screen: Screen::new(KEY),
            deps,
        }
    }

    pub fn state(&self) -> ScreenState<Vec<ScoredNeo>> {
        self.screen.snapshot()
    }

    async fn fetch_ranked(&self) -> Result<Vec<ScoredNeo>> {
        let url = self
            .deps
            .config
            .neo_feed_url()
            .map_err(|e| FetchError::malformed("neo feed url", format!("{e:#}")))?;
        let feed = NeoFeed::fetch(self.deps.fetcher.as_ref(), &url).await?;
        tracing::info!(
            dates = feed.near_earth_objects.0.len(),
            objects = feed.near_earth_objects.len_objects(),
            "neo feed fetched"
        );
        rank_threats(
            feed.near_earth_objects,
            self.deps.config.degenerate_policy,
            self.deps.config.top_n,
        )
    }

    pub async fn load(&self, ticket: LoadTicket) {
        match self.fetch_ranked().await {
            Ok(ranked) => {
                if self.screen.complete(ticket, ranked) {
                    tracing::info!(screen = KEY, "loaded");
                }
            }
            Err(e) => {
                if self.screen.fail(ticket, &e) {
                    self.deps
                        .notifier
                        .notify(&Notification::now(KEY, e.to_string()))
                        .await;
                }
            }
        }
    }

    fn spawn(self: Arc<Self>, ticket: LoadTicket) -> JoinHandle<()> {
        tokio::spawn(async move { self.load(ticket).await })
    }
}

impl ScreenController for AsteroidsScreen {
    fn key(&self) -> &'static str {
        KEY
    }

    fn title(&self) -> &'static str {
        "Asteroids"
    }

    fn mount(self: Arc<Self>) -> Option<JoinHandle<()>> {
        let ticket = self.screen.mount()?;
        Some(self.spawn(ticket))
    }

    fn refresh(self: Arc<Self>) -> Option<JoinHandle<()>> {
        let ticket = self.screen.begin();
        Some(self.spawn(ticket))
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    fn view(&self) -> serde_json::Value {
        to_view(KEY, &self.screen.snapshot())
    }
}
