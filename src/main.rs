//! Space Stuff: binary entrypoint
//! Boots the Axum HTTP server that backs the app's screens.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("space_stuff=info,warn"));

    // try_init: the deployment runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up NASA_API_KEY / ISS_REFRESH_SECS / DISCORD_WEBHOOK_URL.
    let _ = dotenvy::dotenv();

    init_tracing();

    let router = space_stuff::app().await?;

    Ok(router.into())
}
