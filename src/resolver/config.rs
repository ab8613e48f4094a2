// src/resolver/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "LYRICS_FALLBACK_CONFIG_PATH";

/// Provider priority and per-probe policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResolverConfig {
    /// Priority order by source name. Empty means registration order.
    #[serde(default)]
    pub order: Vec<String>,
    /// Sources never probed.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Deadline applied to every probe; absent or 0 means none.
    #[serde(default)]
    pub probe_timeout_ms: Option<u64>,
}

impl ResolverConfig {
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d.eq_ignore_ascii_case(name))
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    fn cleaned(mut self) -> Self {
        self.order = clean_list(self.order);
        self.disabled = clean_list(self.disabled);
        self
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<ResolverConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading fallback config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing fallback config {}", path.display()))
}

/// Load config using env var + fallbacks:
/// 1) $LYRICS_FALLBACK_CONFIG_PATH
/// 2) config/fallback.toml
/// 3) config/fallback.json
/// 4) defaults
pub fn load_config_default() -> Result<ResolverConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
    }
    let toml_p = PathBuf::from("config/fallback.toml");
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from("config/fallback.json");
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    Ok(ResolverConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ResolverConfig> {
    let try_toml = hint_ext == "toml" || (hint_ext != "json" && !s.trim_start().starts_with('{'));
    if try_toml {
        if let Ok(v) = toml::from_str::<ResolverConfig>(s) {
            return Ok(v.cleaned());
        }
    }
    if let Ok(v) = serde_json::from_str::<ResolverConfig>(s) {
        return Ok(v.cleaned());
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<ResolverConfig>(s) {
            return Ok(v.cleaned());
        }
    }
    Err(anyhow!("unsupported fallback config format"))
}

/// Trim, drop blanks, drop repeats (case-insensitive) keeping the first occurrence.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if t.is_empty() || out.iter().any(|o| o.eq_ignore_ascii_case(t)) {
            continue;
        }
        out.push(t.to_string());
    }
    out
}
