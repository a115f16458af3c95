use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::screens::{ScreenController, ScreenRegistry};

#[derive(Clone)]
pub struct AppState {
    pub screens: ScreenRegistry,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(home))
        .route("/screens", get(list_screens))
        .route("/screens/{name}", get(show_screen).delete(dismiss_screen))
        .route("/screens/{name}/refresh", post(refresh_screen))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn not_found(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("unknown screen '{name}'") })),
    )
        .into_response()
}

fn lookup(state: &AppState, name: &str) -> Result<Arc<dyn ScreenController>, Response> {
    state.screens.get(name).ok_or_else(|| not_found(name))
}

async fn home(State(state): State<AppState>) -> Response {
    match lookup(&state, "home") {
        Ok(s) => Json(s.view()).into_response(),
        Err(rsp) => rsp,
    }
}

async fn list_screens(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.screens.keys())
}

/// First visit of an Idle screen mounts it; the response shows the state
/// right after that (usually "loading").
async fn show_screen(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let screen = match lookup(&state, &name) {
        Ok(s) => s,
        Err(rsp) => return rsp,
    };
    if screen.clone().mount().is_some() {
        tracing::info!(screen = %name, "mounted");
    }
    Json(screen.view()).into_response()
}

async fn refresh_screen(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let screen = match lookup(&state, &name) {
        Ok(s) => s,
        Err(rsp) => return rsp,
    };
    let _ = screen.clone().refresh();
    (StatusCode::ACCEPTED, Json(screen.view())).into_response()
}

async fn dismiss_screen(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let screen = match lookup(&state, &name) {
        Ok(s) => s,
        Err(rsp) => return rsp,
    };
    screen.unmount();
    tracing::info!(screen = %name, "dismissed");
    Json(screen.view()).into_response()
}
