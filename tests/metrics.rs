// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serial_test::serial;
use std::fs;
use tower::ServiceExt;

use space_stuff::config::app::ENV_CONFIG_PATH;

// Full in-process app with a throwaway config (no webhook, no network at build).
async fn build_app(dir: &tempfile::TempDir) -> Router {
    let p = dir.path().join("space.toml");
    fs::write(&p, "nasa_api_key = \"TEST\"\n").unwrap();
    std::env::set_var(ENV_CONFIG_PATH, p.display().to_string());
    std::env::remove_var("DISCORD_WEBHOOK_URL");
    let app = space_stuff::app()
        .await
        .expect("app() should build Router in tests");
    std::env::remove_var(ENV_CONFIG_PATH);
    app
}

async fn scrape(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[serial]
#[tokio::test]
async fn metrics_endpoint_contains_expected_series() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(&dir).await;
    let text = scrape(&app).await;

    for needle in [
        "upstream_requests_total",
        "upstream_errors_total",
        "neo_degenerate_total",
        "screen_stale_completions_total",
        "notifications_suppressed_total",
        "iss_last_refresh_ts",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n{text}"
        );
    }
}

#[serial]
#[tokio::test]
async fn dismissing_a_loading_screen_is_counted_as_stale() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(&dir).await;

    // Mount then dismiss: the load result that lands later is stale.
    let screen = space_stuff::screen::Screen::<u32>::new("scratch");
    let ticket = screen.mount().unwrap();
    screen.unmount();
    assert!(!screen.complete(ticket, 1));

    let text = scrape(&app).await;
    let line = text
        .lines()
        .find(|l| l.starts_with("screen_stale_completions_total"))
        .expect("stale counter exported");
    let value: f64 = line.rsplit(' ').next().unwrap().parse().unwrap();
    assert!(value >= 1.0, "{line}");
}
