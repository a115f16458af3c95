// src/screens/updates.rs
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::{to_view, ScreenController, ScreenDeps};
use crate::news::{NewsBoard, NewsPipeline, PipelineOutcome};
use crate::notify::Notification;
use crate::screen::{LoadTicket, Screen, ScreenState};

pub const KEY: &str = "updates";

/// Articles, reports and blogs merged into one chronological feed.
pub struct UpdatesScreen {
    screen: Screen<NewsBoard>,
    pipeline: NewsPipeline,
    deps: ScreenDeps,
}

impl UpdatesScreen {
    pub fn new(deps: ScreenDeps) -> Self {
        Self {
            screen: Screen::new(KEY),
            pipeline: NewsPipeline::from_endpoints(&deps.config.endpoints),
            deps,
        }
    }

    pub fn state(&self) -> ScreenState<NewsBoard> {
        self.screen.snapshot()
    }

    pub async fn load(&self, ticket: LoadTicket) {
        let res = self
            .pipeline
            .run(self.deps.fetcher.as_ref(), |kind, items| {
                self.screen.progress(ticket, |board| board.store(kind, items))
            })
            .await;

        match res {
            Ok(PipelineOutcome::Completed) => {
                if self.screen.finish(ticket) {
                    tracing::info!(screen = KEY, "loaded");
                }
            }
            Ok(PipelineOutcome::Abandoned { at }) => {
                tracing::debug!(screen = KEY, stage = at.as_str(), "dismissed mid-pipeline");
            }
            Err(failure) => {
                if self.screen.fail(ticket, &failure) {
                    self.deps
                        .notifier
                        .notify(&Notification::now(KEY, failure.to_string()))
                        .await;
                }
            }
        }
    }

    fn spawn(self: Arc<Self>, ticket: LoadTicket) -> JoinHandle<()> {
        tokio::spawn(async move { self.load(ticket).await })
    }
}

impl ScreenController for UpdatesScreen {
    fn key(&self) -> &'static str {
        KEY
    }

    fn title(&self) -> &'static str {
        "Updates"
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
