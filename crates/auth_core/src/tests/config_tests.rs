use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn missing_url_is_reported() {
    let err = resolve(
        FileConfig::default(),
        env_from(&[("SUPABASE_ANON_KEY", "k")]),
        ConfigOverrides::default(),
    )
    .expect_err("url required");
    assert!(matches!(err, ConfigError::Missing("supabase_url")));
}

#[test]
fn missing_key_is_reported() {
    let err = resolve(
        FileConfig::default(),
        env_from(&[("SUPABASE_URL", "https://proj.supabase.co")]),
        ConfigOverrides::default(),
    )
    .expect_err("key required");
    assert!(matches!(err, ConfigError::Missing("anon_key")));
}

#[test]
fn vite_prefixed_env_names_are_accepted() {
    let cfg = resolve(
        FileConfig::default(),
        env_from(&[
            ("VITE_SUPABASE_URL", "https://proj.supabase.co"),
            ("VITE_SUPABASE_ANON_KEY", "vite-key"),
        ]),
        ConfigOverrides {
            data_dir: Some("/tmp/probe".into()),
            ..Default::default()
        },
    )
    .expect("config");
    assert_eq!(cfg.supabase_url.as_str(), "https://proj.supabase.co/");
    assert_eq!(cfg.anon_key, "vite-key");
    assert_eq!(cfg.admin_email, DEFAULT_ADMIN_EMAIL);
}

#[test]
fn overrides_beat_env_and_env_beats_file() {
    let file = FileConfig {
        supabase_url: Some("https://file.example".into()),
        anon_key: Some("file-key".into()),
        admin_email: Some("file-admin@example.com".into()),
        data_dir: Some("/tmp/file".into()),
    };
    let cfg = resolve(
        file,
        env_from(&[
            ("SUPABASE_URL", "https://env.example"),
            ("SUPABASE_ANON_KEY", "env-key"),
            ("LOGIN_PROBE_DATA_DIR", "   "),
        ]),
        ConfigOverrides {
            anon_key: Some("flag-key".into()),
            ..Default::default()
        },
    )
    .expect("config");
    assert_eq!(cfg.supabase_url.as_str(), "https://env.example/");
    assert_eq!(cfg.anon_key, "flag-key");
    assert_eq!(cfg.admin_email, "file-admin@example.com");
    assert_eq!(cfg.data_dir, PathBuf::from("/tmp/file"));
    assert_eq!(cfg.session_path(), PathBuf::from("/tmp/file/session.json"));
}

#[test]
fn base_url_keeps_path_prefix() {
    let url = normalize_base_url(" https://gateway.example/supabase ").expect("url");
    assert_eq!(url.as_str(), "https://gateway.example/supabase/");
    assert_eq!(
        url.join("auth/v1/token").expect("join").as_str(),
        "https://gateway.example/supabase/auth/v1/token"
    );
}

#[test]
fn invalid_url_is_rejected() {
    assert!(matches!(
        normalize_base_url("not a url"),
        Err(ConfigError::InvalidUrl { .. })
    ));
}

#[test]
fn toml_file_is_read_from_explicit_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("login_probe_config_{suffix}.toml"));
    fs::write(
        &path,
        "supabase_url = \"https://toml.example\"\nanon_key = \"toml-key\"\n",
    )
    .expect("write");

    let file = read_file_config(&path).expect("parse");
    assert_eq!(file.supabase_url.as_deref(), Some("https://toml.example"));
    assert_eq!(file.anon_key.as_deref(), Some("toml-key"));

    fs::write(&path, "supabase_url = [").expect("write");
    assert!(matches!(
        read_file_config(&path),
        Err(ConfigError::Parse { .. })
    ));

    fs::remove_file(path).expect("cleanup");
}
