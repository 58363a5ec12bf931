// tests/sync_config.rs
use medium_sync::ingest::config::{load_config_default, load_config_from};
use medium_sync::sync::Retention;
use std::path::PathBuf;
use std::{env, fs};

const ENV_KEYS: [&str; 4] = [
    "MEDIUM_SYNC_CONFIG",
    "MEDIUM_AUTHOR",
    "MEDIUM_STORE_PATH",
    "MEDIUM_SYNC_INTERVAL_SECS",
];

fn clear_env() {
    for k in ENV_KEYS {
        env::remove_var(k);
    }
}

#[serial_test::serial]
#[test]
fn shipped_config_parses() {
    let cfg = load_config_from(&PathBuf::from("config/medium_sync.toml")).unwrap();
    assert_eq!(cfg.interval_secs, 7200);
    assert_eq!(cfg.retention, Retention::Keep);
    let kw = PathBuf::from("config/category_keywords.toml");
    let mut with_kw = cfg.clone();
    with_kw.keywords_path = Some(kw);
    assert!(with_kw.classifier().is_ok());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing at all → defaults
    let v = load_config_default().unwrap();
    assert_eq!(v.author, "andersonchen_2095");
    assert_eq!(v.store_path, PathBuf::from("data/medium-posts.json"));

    // 2) Fallback JSON in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("medium_sync.json"), r#"{"author":"json-author"}"#).unwrap();
    assert_eq!(load_config_default().unwrap().author, "json-author");

    // 3) TOML wins over JSON
    fs::write(cfg_dir.join("medium_sync.toml"), r#"author = "toml-author""#).unwrap();
    assert_eq!(load_config_default().unwrap().author, "toml-author");

    // 4) Explicit path via env wins over both
    let p_env = tmp.path().join("elsewhere.toml");
    fs::write(&p_env, "author = \"env-file\"\ninterval_secs = 60\n").unwrap();
    env::set_var("MEDIUM_SYNC_CONFIG", p_env.display().to_string());
    let ve = load_config_default().unwrap();
    assert_eq!(ve.author, "env-file");
    assert_eq!(ve.interval_secs, 60);

    // 5) Field overrides on top
    env::set_var("MEDIUM_AUTHOR", "override");
    env::set_var("MEDIUM_SYNC_INTERVAL_SECS", "120");
    let vo = load_config_default().unwrap();
    assert_eq!(vo.author, "override");
    assert_eq!(vo.interval_secs, 120);

    env::set_var("MEDIUM_SYNC_INTERVAL_SECS", "soon");
    assert!(load_config_default().is_err());

    env::set_var("MEDIUM_SYNC_CONFIG", tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}
