// src/screens/home.rs
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::ScreenController;

pub const APP_TITLE: &str = "SPACE STUFF";

/// Static landing screen listing where the user can go. Never fetches.
pub struct HomeScreen {
    nav: Vec<(&'static str, &'static str)>,
}

impl HomeScreen {
    pub fn new(nav: Vec<(&'static str, &'static str)>) -> Self {
        Self { nav }
    }
}

impl ScreenController for HomeScreen {
    fn key(&self) -> &'static str {
        "home"
    }

    fn title(&self) -> &'static str {
        APP_TITLE
    }

    fn mount(self: Arc<Self>) -> Option<JoinHandle<()>> {
        None
    }

    fn refresh(self: Arc<Self>) -> Option<JoinHandle<()>> {
        None
    }

    fn unmount(&self) {}

    fn view(&self) -> serde_json::Value {
        let links: Vec<_> = self
            .nav
            .iter()
            .map(|(key, title)| json!({ "screen": key, "title": title, "href": format!("/screens/{key}") }))
            .collect();
        json!({
            "screen": "home",
            "status": "loaded",
            "data": { "title": APP_TITLE, "links": links }
        })
    }
}
