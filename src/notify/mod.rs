// src/notify/mod.rs
//! User-facing failure notifications.

pub mod antiflutter;
pub mod discord;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use std::sync::Mutex;

use self::antiflutter::AntiFlutter;
use self::discord::DiscordNotifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    /// Route key of the screen that failed, e.g. "asteroids".
    pub screen: String,
    pub message: String,
    pub ts: DateTime<Utc>,
}

impl Notification {
    pub fn now(screen: &str, message: impl Into<String>) -> Self {
        Self {
            screen: screen.to_string(),
            message: message.into(),
            ts: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, n: &Notification) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Always-on sink: the failure lands in the log.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, n: &Notification) -> Result<()> {
        tracing::warn!(screen = %n.screen, ts = %n.ts.to_rfc3339(), "{}", n.message);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Fans a notification out to every sink, behind a per-screen cooldown.
pub struct NotifierMux {
    sinks: Vec<Box<dyn Notifier>>,
    gate: Mutex<AntiFlutter>,
}

impl NotifierMux {
    pub fn new(sinks: Vec<Box<dyn Notifier>>, cooldown_secs: i64) -> Self {
        Self {
            sinks,
            gate: Mutex::new(AntiFlutter::new(cooldown_secs)),
        }
    }

    /// Log sink always; Discord when DISCORD_WEBHOOK_URL is set.
    pub fn from_env(cooldown_secs: i64) -> Self {
        let mut sinks: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
        if let Some(url) = std::env::var("DISCORD_WEBHOOK_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
        {
            sinks.push(Box::new(DiscordNotifier::new(url)));
        }
        Self::new(sinks, cooldown_secs)
    }

    /// Returns true if the notification went out (i.e. was not suppressed).
    pub async fn notify(&self, n: &Notification) -> bool {
        {
            let mut gate = self.gate.lock().expect("notify gate poisoned");
            if !gate.should_alert(&n.screen, n.ts) {
                counter!("notifications_suppressed_total").increment(1);
                tracing::debug!(screen = %n.screen, "notification suppressed by cooldown");
                return false;
            }
            gate.record_alert(&n.screen, n.ts);
        }

        for sink in &self.sinks {
            if let Err(e) = sink.send(n).await {
                tracing::warn!(error = ?e, sink = sink.name(), "notification sink failed");
            }
        }
        true
    }
}
