// src/screens/iss_location.rs
use metrics::gauge;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{to_view, ScreenController, ScreenDeps};
use crate::iss::SatellitePosition;
use crate::notify::Notification;
use crate::screen::{LoadTicket, Screen, ScreenState};

pub const KEY: &str = "iss-location";

/// Live ISS position, re-fetched on a fixed interval while mounted.
pub struct IssLocationScreen {
    screen: Screen<SatellitePosition>,
    deps: ScreenDeps,
}

impl IssLocationScreen {
    pub fn new(deps: ScreenDeps) -> Self {
        Self {
            screen: Screen::new(KEY),
            deps,
        }
    }

    pub fn state(&self) -> ScreenState<SatellitePosition> {
        self.screen.snapshot()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.deps.config.iss_refresh_secs)
    }

    /// One fetch. Returns false once the ticket is stale.
    pub async fn tick(&self, ticket: LoadTicket) -> bool {
        match SatellitePosition::fetch(self.deps.fetcher.as_ref(), &self.deps.config.endpoints.iss).await {
            Ok(pos) => {
                let ok = self.screen.complete(ticket, pos);
                if ok {
                    gauge!("iss_last_refresh_ts").set(chrono::Utc::now().timestamp() as f64);
                }
                ok
            }
            Err(e) => {
                let ok = self.screen.fail(ticket, &e);
                if ok {
                    // Delivery runs off the poll loop; ticks never wait on a webhook.
                    let notifier = self.deps.notifier.clone();
                    let n = Notification::now(KEY, e.to_string());
                    tokio::spawn(async move {
                        notifier.notify(&n).await;
                    });
                }
                ok
            }
        }
    }

    /// Poll until the ticket goes stale (unmount or a newer refresh).
    pub async fn poll(&self, ticket: LoadTicket) {
        let mut ticker = tokio::time::interval(self.refresh_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if !self.screen.is_current(ticket) || !self.tick(ticket).await {
                break;
            }
        }
        tracing::debug!(screen = KEY, "poller stopped");
    }

    fn spawn(self: Arc<Self>, ticket: LoadTicket) -> JoinHandle<()> {
        tokio::spawn(async move { self.poll(ticket).await })
    }
}

impl ScreenController for IssLocationScreen {
    fn key(&self) -> &'static str {
        KEY
    }

    fn title(&self) -> &'static str {
        "ISS Location"
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
