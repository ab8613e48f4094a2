// tests/lyrics_scenario.rs
use anyhow::{bail, Result};
use lyrics_fallback::resolver::source::{from_fn, from_sync_fn};
use lyrics_fallback::{
    FallbackResolver, LyricLine, LyricsPayload, Outcome, ProbeFailure, Source, SourceChain,
};

fn empty(name: &'static str) -> Box<dyn Source<LyricsPayload>> {
    Box::new(from_sync_fn(name, move || Ok(LyricsPayload::new(name, vec![]))))
}

async fn kpoe() -> Result<LyricsPayload> {
    bail!("timeout")
}

fn genius() -> Box<dyn Source<LyricsPayload>> {
    Box::new(from_sync_fn("Genius", || {
        Ok(LyricsPayload::new(
            "Genius",
            vec![LyricLine::plain("lyrics-A")],
        ))
    }))
}

fn providers() -> Vec<Box<dyn Source<LyricsPayload>>> {
    vec![
        empty("LRCLIB"),
        empty("Spotify"),
        Box::new(from_fn("KPoe", kpoe)),
        empty("Musixmatch"),
        genius(),
    ]
}

#[tokio::test]
async fn failing_provider_does_not_hide_later_match() {
    let mut chain = SourceChain::new();
    for p in providers() {
        chain.push_boxed(p).unwrap();
    }

    let r = FallbackResolver::new().resolve(&chain).await;

    assert_eq!(r.winner(), Some("Genius"));
    assert_eq!(r.value().unwrap().plain_text(), "lyrics-A");
    assert_eq!(r.attempts().len(), 5);
    assert_eq!(
        r.attempts()[2].outcome,
        Outcome::Failure(ProbeFailure::new("KPoe", "timeout"))
    );
    assert_eq!(
        r.summary(),
        "LRCLIB=empty, Spotify=empty, KPoe=failure(timeout), Musixmatch=empty, Genius=success"
    );
}

#[tokio::test]
async fn naive_propagation_would_abort_at_first_error() {
    // What the lookup looks like without isolation: `?` ends it at KPoe.
    let mut reached = Vec::new();
    let mut outcome: Result<()> = Ok(());
    for p in providers() {
        reached.push(p.name().to_string());
        if let Err(e) = p.probe().await {
            outcome = Err(e);
            break;
        }
    }
    assert!(outcome.is_err());
    assert_eq!(reached, vec!["LRCLIB", "Spotify", "KPoe"]);
}

#[tokio::test]
async fn blank_lyrics_count_as_empty() {
    let chain = SourceChain::new()
        .with(from_sync_fn("Spotify", || {
            Ok(LyricsPayload::new(
                "Spotify",
                vec![LyricLine::timed(0, " "), LyricLine::plain("")],
            ))
        }))
        .unwrap()
        .with(from_sync_fn("LRCLIB", || {
            Ok(LyricsPayload::new(
                "LRCLIB",
                vec![LyricLine::timed(0, "hello"), LyricLine::timed(900, "world")],
            ))
        }))
        .unwrap();

    let r = FallbackResolver::new().resolve(&chain).await;
    assert!(r.attempts()[0].outcome.is_empty());
    assert_eq!(r.winner(), Some("LRCLIB"));
    assert!(r.value().unwrap().synced);
}
