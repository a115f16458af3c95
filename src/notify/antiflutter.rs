// src/notify/antiflutter.rs
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;

/// Cooldown gate to prevent notification spam, tracked per screen.
/// - First alert for a screen always allowed.
/// - Inside that screen's cooldown, alerts are suppressed.
/// - State is updated explicitly via `record_alert`.
#[derive(Debug, Clone, Default)]
pub struct AntiFlutter {
    cooldown: ChronoDuration,
    last_alert: HashMap<String, DateTime<Utc>>,
}

impl AntiFlutter {
    /// `cooldown_secs` < 0 is treated as 0 (no cooldown).
    pub fn new(cooldown_secs: i64) -> Self {
        Self {
            cooldown: ChronoDuration::seconds(cooldown_secs.max(0)),
            last_alert: HashMap::new(),
        }
    }

    /// Check if we may alert at `now` for `screen`. Does NOT mutate state.
    pub fn should_alert(&self, screen: &str, now: DateTime<Utc>) -> bool {
        match self.last_alert.get(screen) {
            None => true,
            Some(ts) => now.signed_duration_since(*ts) >= self.cooldown,
        }
    }

    pub fn record_alert(&mut self, screen: &str, now: DateTime<Utc>) {
        self.last_alert.insert(screen.to_string(), now);
    }
}
