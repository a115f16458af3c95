// src/screen.rs
//! Per-screen load state machine.
//!
//! Idle ──mount──▶ Loading ──complete──▶ Loaded
//!                    │                     │
//!                    └──fail──▶ Failed ◀───┘ (poller refresh)
//!
//! Every load carries a `LoadTicket`. `unmount` (and any new `begin`)
//! invalidates outstanding tickets, so a response that arrives after the
//! screen was dismissed is dropped instead of mutating its state.

use metrics::counter;
use serde::Serialize;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScreenState<T> {
    Idle,
    Loading {
        #[serde(skip_serializing_if = "Option::is_none")]
        partial: Option<T>,
    },
    Loaded {
        data: T,
    },
    Failed {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        partial: Option<T>,
    },
}

impl<T> ScreenState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ScreenState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading { .. })
    }

    /// Whatever data the screen currently has, complete or partial.
    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Idle => None,
            ScreenState::Loading { partial } | ScreenState::Failed { partial, .. } => partial.as_ref(),
            ScreenState::Loaded { data } => Some(data),
        }
    }

    fn take_data(&mut self) -> Option<T> {
        match std::mem::replace(self, ScreenState::Idle) {
            ScreenState::Idle => None,
            ScreenState::Loading { partial } | ScreenState::Failed { partial, .. } => partial,
            ScreenState::Loaded { data } => Some(data),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct Inner<T> {
    state: ScreenState<T>,
    generation: u64,
}

#[derive(Debug)]
pub struct Screen<T> {
    name: &'static str,
    inner: Mutex<Inner<T>>,
}

impl<T: Clone> Screen<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Inner {
                state: ScreenState::Idle,
                generation: 0,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a load only if the screen is Idle. A screen that is already
    /// loading or showing data is left alone.
    pub fn mount(&self) -> Option<LoadTicket> {
        let mut g = self.inner.lock().expect("screen mutex poisoned");
        if !g.state.is_idle() {
            return None;
        }
        Some(Self::begin_locked(self.name, &mut g))
    }

    /// Start a new load unconditionally; earlier tickets go stale.
    /// Data already on screen is carried over as partial data.
    pub fn begin(&self) -> LoadTicket {
        let mut g = self.inner.lock().expect("screen mutex poisoned");
        Self::begin_locked(self.name, &mut g)
    }

    fn begin_locked(name: &'static str, g: &mut Inner<T>) -> LoadTicket {
        g.generation += 1;
        let partial = g.state.take_data();
        g.state = ScreenState::Loading { partial };
        tracing::debug!(screen = name, generation = g.generation, "load started");
        LoadTicket(g.generation)
    }

    /// Dismiss the screen: back to Idle, every outstanding ticket goes stale.
    pub fn unmount(&self) {
        let mut g = self.inner.lock().expect("screen mutex poisoned");
        g.generation += 1;
        g.state = ScreenState::Idle;
        tracing::debug!(screen = self.name, "unmounted");
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        let g = self.inner.lock().expect("screen mutex poisoned");
        g.generation == ticket.0 && !g.state.is_idle()
    }

    /// Store intermediate data while loading. Returns false for a stale ticket.
    pub fn progress(&self, ticket: LoadTicket, f: impl FnOnce(&mut T)) -> bool
    where
        T: Default,
    {
        self.transition(ticket, "progress", |state| {
            let mut data = state.take_data().unwrap_or_default();
            f(&mut data);
            ScreenState::Loading {
                partial: Some(data),
            }
        })
    }

    pub fn complete(&self, ticket: LoadTicket, data: T) -> bool {
        self.transition(ticket, "complete", |_| ScreenState::Loaded { data })
    }

    /// Promote whatever `progress` stored to Loaded.
    pub fn finish(&self, ticket: LoadTicket) -> bool
    where
        T: Default,
    {
        self.transition(ticket, "finish", |state| ScreenState::Loaded {
            data: state.take_data().unwrap_or_default(),
        })
    }

    /// Move to Failed, keeping any data already on screen.
    pub fn fail(&self, ticket: LoadTicket, error: impl std::fmt::Display) -> bool {
        let error = error.to_string();
        self.transition(ticket, "fail", |state| ScreenState::Failed {
            partial: state.take_data(),
            error,
        })
    }

    fn transition(
        &self,
        ticket: LoadTicket,
        what: &'static str,
        next: impl FnOnce(&mut ScreenState<T>) -> ScreenState<T>,
    ) -> bool {
        let mut g = self.inner.lock().expect("screen mutex poisoned");
        if g.generation != ticket.0 || g.state.is_idle() {
            tracing::debug!(screen = self.name, transition = what, "stale completion ignored");
            counter!("screen_stale_completions_total").increment(1);
            return false;
        }
        let new_state = next(&mut g.state);
        g.state = new_state;
        true
    }

    pub fn snapshot(&self) -> ScreenState<T> {
        self.inner
            .lock()
            .expect("screen mutex poisoned")
            .state
            .clone()
    }
}
