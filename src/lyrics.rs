// src/lyrics.rs
use serde::{Deserialize, Serialize};

use crate::resolver::emptiness::Emptiness;

/// Track a host wants lyrics for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_ms: Option<u64>,
}

impl TrackQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album: None,
            duration_ms: None,
        }
    }

    /// `artist - title`, for logs.
    pub fn display(&self) -> String {
        format!("{} - {}", self.artist.trim(), self.title.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LyricLine {
    /// Line start in milliseconds; `None` for unsynced lyrics.
    pub start_ms: Option<u64>,
    pub text: String,
}

impl LyricLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            start_ms: None,
            text: text.into(),
        }
    }

    pub fn timed(start_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms: Some(start_ms),
            text: text.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LyricsPayload {
    pub provider: String,
    pub synced: bool,
    pub lines: Vec<LyricLine>,
}

impl LyricsPayload {
    /// Build a payload; `synced` is derived from the lines.
    pub fn new(provider: impl Into<String>, lines: Vec<LyricLine>) -> Self {
        let mut p = Self {
            provider: provider.into(),
            synced: false,
            lines,
        };
        p.synced = p.is_synced();
        p
    }

    /// Every non-blank line carries a start time (and there is at least one).
    pub fn is_synced(&self) -> bool {
        let mut texts = self.lines.iter().filter(|l| !l.is_blank()).peekable();
        texts.peek().is_some() && texts.all(|l| l.start_ms.is_some())
    }

    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Emptiness for LyricLine {
    fn is_empty_value(&self) -> bool {
        self.is_blank()
    }
}

impl Emptiness for LyricsPayload {
    fn is_empty_value(&self) -> bool {
        self.lines.iter().all(LyricLine::is_blank)
    }
}
