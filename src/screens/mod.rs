// src/screens/mod.rs
//! Screen controllers: each owns its `Screen` state exclusively and runs
//! its fetches on the tokio runtime. Nothing else mutates a screen's state.

pub mod asteroids;
pub mod home;
pub mod iss_location;
pub mod updates;

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::fetch::JsonFetcher;
use crate::notify::NotifierMux;

pub use asteroids::AsteroidsScreen;
pub use home::HomeScreen;
pub use iss_location::IssLocationScreen;
pub use updates::UpdatesScreen;

pub trait ScreenController: Send + Sync {
    /// Route key, e.g. "asteroids".
    fn key(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Start loading if the screen is Idle. Returns the spawned load task.
    fn mount(self: Arc<Self>) -> Option<JoinHandle<()>>;

    /// Start a new load; results of any earlier load are dropped.
    fn refresh(self: Arc<Self>) -> Option<JoinHandle<()>>;

    fn unmount(&self);

    /// Current state as JSON.
    fn view(&self) -> serde_json::Value;
}

/// Everything a fetching screen needs from the outside.
#[derive(Clone)]
pub struct ScreenDeps {
    pub config: Arc<AppConfig>,
    pub fetcher: Arc<dyn JsonFetcher>,
    pub notifier: Arc<NotifierMux>,
}

#[derive(Clone)]
pub struct ScreenRegistry {
    screens: Vec<Arc<dyn ScreenController>>,
}

impl ScreenRegistry {
    pub fn new(deps: ScreenDeps) -> Self {
        let fetching: Vec<Arc<dyn ScreenController>> = vec![
            Arc::new(IssLocationScreen::new(deps.clone())),
            Arc::new(AsteroidsScreen::new(deps.clone())),
            Arc::new(UpdatesScreen::new(deps)),
        ];
        let nav = fetching.iter().map(|s| (s.key(), s.title())).collect();
        let mut screens: Vec<Arc<dyn ScreenController>> = vec![Arc::new(HomeScreen::new(nav))];
        screens.extend(fetching);
        Self { screens }
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn ScreenController>> {
        self.screens.iter().find(|s| s.key() == key).cloned()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.screens.iter().map(|s| s.key()).collect()
    }
}

/// Serialize a screen snapshot; a serialization failure becomes a Failed view.
pub(crate) fn to_view<T: serde::Serialize>(key: &str, state: &T) -> serde_json::Value {
    let mut v = serde_json::to_value(state).unwrap_or_else(|e| {
        serde_json::json!({ "status": "failed", "error": format!("unrenderable state: {e}") })
    });
    if let Some(obj) = v.as_object_mut() {
        obj.insert("screen".into(), serde_json::Value::String(key.to_string()));
    }
    v
}
