// src/notify/discord.rs
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{Notification, Notifier};

#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
}

impl DiscordNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    async fn post_with_retry(&self, payload: &DiscordWebhookPayload) -> Result<()> {
        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.webhook)
                .timeout(self.timeout)
                .json(payload)
                .send()
                .await;

            let err = match res {
                Ok(rsp) => match rsp.error_for_status_ref() {
                    Ok(_) => return Ok(()),
                    Err(e) => anyhow!("Discord webhook HTTP error: {e}"),
                },
                Err(e) => anyhow!("Discord webhook request failed: {e}"),
            };
            if attempt >= self.max_retries {
                return Err(err);
            }
            tokio::time::sleep(backoff(attempt)).await;
        }
    }
}

/// 500 ms doubling per attempt, capped at 32 s.
fn backoff(attempt: u8) -> Duration {
    let shift = u32::from(attempt.saturating_sub(1)).min(6);
    Duration::from_millis(500u64 << shift)
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, n: &Notification) -> Result<()> {
        let payload = DiscordWebhookPayload::from_notification(n);
        self.post_with_retry(&payload).await
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}

#[derive(Serialize)]
struct DiscordEmbed {
    title: String,
    description: String,
}

#[derive(Serialize)]
struct DiscordWebhookPayload {
    content: Option<String>,
    embeds: Vec<DiscordEmbed>,
}

impl DiscordWebhookPayload {
    fn from_notification(n: &Notification) -> Self {
        Self {
            content: None,
            embeds: vec![DiscordEmbed {
                title: format!("Screen failed: {}", n.screen),
                description: format!("{}\n**Time (UTC):** {}", n.message, n.ts.to_rfc3339()),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_names_screen_and_message() {
        let n = Notification::now("asteroids", "upstream returned HTTP 503");
        let v = serde_json::to_value(DiscordWebhookPayload::from_notification(&n)).unwrap();
        assert_eq!(v["embeds"][0]["title"], "Screen failed: asteroids");
        assert!(v["embeds"][0]["description"]
            .as_str()
            .unwrap()
            .starts_with("upstream returned HTTP 503"));
        assert!(v["content"].is_null());
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff(1), Duration::from_millis(500));
        assert_eq!(backoff(2), Duration::from_millis(1_000));
        assert_eq!(backoff(7), Duration::from_secs(32));
        // high retry counts must not overflow the shift
        assert_eq!(backoff(200), Duration::from_secs(32));
        assert_eq!(backoff(u8::MAX), Duration::from_secs(32));
    }

    #[tokio::test]
    async fn unreachable_webhook_gives_error_after_retries() {
        let d = DiscordNotifier::new("http://127.0.0.1:9/hook".into())
            .with_timeout(1)
            .with_retries(1);
        assert!(d.send(&Notification::now("iss-location", "x")).await.is_err());
    }
}
