// tests/resolver_config.rs
use lyrics_fallback::resolver::config::{load_config_default, load_config_from, ENV_CONFIG_PATH};
use lyrics_fallback::resolver::source::from_sync_fn;
use lyrics_fallback::{FallbackResolver, ResolverConfig, Source, SourceChain};
use std::{env, fs};

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("fallback.toml");
    fs::write(
        &p_toml,
        r#"
order = [" Genius ", "", "LRCLIB", "LRCLIB"]
disabled = ["KPoe"]
probe_timeout_ms = 3000
"#,
    )
    .unwrap();
    let c = load_config_from(&p_toml).unwrap();
    assert_eq!(c.order, vec!["Genius".to_string(), "LRCLIB".to_string()]);
    assert_eq!(c.disabled, vec!["KPoe".to_string()]);
    assert_eq!(c.probe_timeout_ms, Some(3000));

    let p_json = dir.path().join("fallback.json");
    fs::write(&p_json, r#"{"order": ["Musixmatch", " Spotify  "]}"#).unwrap();
    let cj = load_config_from(&p_json).unwrap();
    assert_eq!(
        cj.order,
        vec!["Musixmatch".to_string(), "Spotify".to_string()]
    );
    assert!(cj.disabled.is_empty());
    assert_eq!(cj.probe_timeout(), None);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var(ENV_CONFIG_PATH);

    // 1) Nothing on disk -> defaults
    let c = load_config_default().unwrap();
    assert_eq!(c, ResolverConfig::default());

    // 2) ./config/fallback.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("fallback.toml"), r#"order = ["LRCLIB","Genius"]"#).unwrap();
    let ct = load_config_default().unwrap();
    assert_eq!(ct.order, vec!["LRCLIB".to_string(), "Genius".to_string()]);

    // 3) Env wins
    let p_env = tmp.path().join("custom.json");
    fs::write(&p_env, r#"{"order": ["X"]}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let ce = load_config_default().unwrap();
    assert_eq!(ce.order, vec!["X".to_string()]);

    // 4) Env pointing nowhere is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

#[tokio::test]
async fn configured_order_drives_resolution() {
    let registry: Vec<Box<dyn Source<String>>> = vec![
        Box::new(from_sync_fn("LRCLIB", || Ok("lrclib".to_string()))),
        Box::new(from_sync_fn("KPoe", || Ok("kpoe".to_string()))),
        Box::new(from_sync_fn("Genius", || Ok("genius".to_string()))),
    ];
    let cfg = ResolverConfig {
        order: vec!["KPoe".into(), "Genius".into()],
        disabled: vec!["kpoe".into()],
        probe_timeout_ms: Some(1_000),
    };

    let chain = SourceChain::from_registry(registry, &cfg).unwrap();
    assert_eq!(chain.names(), vec!["Genius", "LRCLIB"]);

    let r = FallbackResolver::new().resolve(&chain).await;
    assert_eq!(r.winner(), Some("Genius"));
    assert_eq!(r.attempts().len(), 1);
}

#[test]
fn duplicate_registry_names_are_rejected() {
    let registry: Vec<Box<dyn Source<String>>> = vec![
        Box::new(from_sync_fn("Genius", || Ok(String::new()))),
        Box::new(from_sync_fn("Genius", || Ok(String::new()))),
    ];
    let err = SourceChain::from_registry(registry, &ResolverConfig::default())
        .err()
        .unwrap();
    assert!(err.to_string().contains("Genius"));
}
