//! Runs the three upstream pipelines once against the live APIs and prints
//! what each screen would show.

use space_stuff::fetch::HttpFetcher;
use space_stuff::iss::SatellitePosition;
use space_stuff::neo::{rank_threats, NeoFeed};
use space_stuff::news::{NewsBoard, NewsPipeline};
use space_stuff::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let cfg = AppConfig::load_default()?;
    let fetcher = HttpFetcher::new(cfg.request_timeout_secs);

    match SatellitePosition::fetch(&fetcher, &cfg.endpoints.iss).await {
        Ok(p) => println!(
            "ISS  lat {:.3}  lon {:.3}  alt {:.1} km  vel {:.0} km/h",
            p.latitude, p.longitude, p.altitude, p.velocity
        ),
        Err(e) => println!("ISS  failed: {e}"),
    }

    let ranked = async {
        let feed = NeoFeed::fetch(&fetcher, &cfg.neo_feed_url()?).await?;
        Ok::<_, anyhow::Error>(rank_threats(
            feed.near_earth_objects,
            cfg.degenerate_policy,
            cfg.top_n,
        )?)
    }
    .await;
    match ranked {
        Ok(list) => {
            for (i, s) in list.iter().enumerate() {
                println!(
                    "NEO  #{} {:<28} score {:>12.2}  tier {}",
                    i + 1,
                    s.neo.name,
                    s.threat_score,
                    s.tier.level()
                );
            }
        }
        Err(e) => println!("NEO  failed: {e:#}"),
    }

    let mut board = NewsBoard::default();
    let res = NewsPipeline::from_endpoints(&cfg.endpoints)
        .run(&fetcher, |kind, items| {
            board.store(kind, items);
            true
        })
        .await;
    if let Err(e) = res {
        println!("NEWS failed: {e}");
    }
    for ev in board.feed().iter().take(10) {
        println!("NEWS {:<8} {}  {}", ev.kind.as_str(), ev.published_date, ev.title);
    }

    println!("feed-probe done");
    Ok(())
}
