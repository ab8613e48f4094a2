//! Demo that replays one lookup across five lyrics providers, where one of them times out.
//! First with a naive loop that bails on the first error, then with `FallbackResolver`.
//!
//! `DEMO_METRICS=1` prints the Prometheus series recorded during the run.

use anyhow::{bail, Result};
use lyrics_fallback::resolver::config::load_config_default;
use lyrics_fallback::resolver::source::{from_fn, from_sync_fn};
use lyrics_fallback::{
    Emptiness, FallbackResolver, LyricLine, LyricsPayload, Source, SourceChain, TrackQuery,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fallback=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

async fn kpoe_probe() -> Result<LyricsPayload> {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    bail!("timeout")
}

fn empty_provider(name: &'static str) -> Box<dyn Source<LyricsPayload>> {
    Box::new(from_sync_fn(name, move || Ok(LyricsPayload::new(name, vec![]))))
}

fn demo_registry(query: &TrackQuery) -> Vec<Box<dyn Source<LyricsPayload>>> {
    let title = query.title.clone();

    vec![
        empty_provider("LRCLIB"),
        empty_provider("Spotify"),
        Box::new(from_fn("KPoe", kpoe_probe)),
        empty_provider("Musixmatch"),
        Box::new(from_fn("Genius", move || {
            let title = title.clone();
            async move {
                Ok::<_, anyhow::Error>(LyricsPayload::new(
                    "Genius",
                    vec![
                        LyricLine::plain(format!("[{title}]")),
                        LyricLine::plain("lyrics-A"),
                    ],
                ))
            }
        })),
    ]
}

/// The pre-isolation loop: a single provider error aborts the whole lookup.
async fn naive_lookup(sources: &[Box<dyn Source<LyricsPayload>>]) -> Result<Option<LyricsPayload>> {
    for s in sources {
        let found = s.probe().await?;
        if !found.is_empty_value() {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let metrics = if std::env::var("DEMO_METRICS").is_ok_and(|v| v == "1") {
        Some(lyrics_fallback::metrics::Metrics::init()?)
    } else {
        None
    };

    let query = TrackQuery::new("Demo Artist", "Demo Song");
    tracing::info!(track = %query.display(), "looking up lyrics");

    println!("--- naive loop ---");
    match naive_lookup(&demo_registry(&query)).await {
        Ok(Some(p)) => println!("found via {}", p.provider),
        Ok(None) => println!("no lyrics found"),
        Err(e) => println!("lookup aborted: {e:#} (Musixmatch and Genius never checked)"),
    }

    println!("--- fallback resolver ---");
    let cfg = load_config_default()?;
    let chain = SourceChain::from_registry(demo_registry(&query), &cfg)?;
    let result = FallbackResolver::new().resolve(&chain).await;

    println!("attempts: {}", result.summary());
    match (result.winner(), result.value()) {
        (Some(winner), Some(p)) => println!("winner: {winner}\n{}", p.plain_text()),
        _ => println!("no lyrics found"),
    }

    if let Some(m) = metrics {
        println!("--- metrics ---\n{}", m.render());
    }

    println!("fallback-demo done");
    Ok(())
}
