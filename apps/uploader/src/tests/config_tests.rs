use super::{apply_env, apply_file, load_settings, normalize_server_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "server_url = \"http://analysis.local:9000\"\nlog_filter = \"debug\"\n",
    )
    .expect("apply");
    assert_eq!(settings.server_url, "http://analysis.local:9000");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "log_filter = \"warn\"\n").expect("apply");
    assert_eq!(settings.server_url, Settings::default().server_url);
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "server_url = [").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env = HashMap::from([
        ("UPLOADER_SERVER_URL", "http://plain:8000"),
        ("APP__SERVER_URL", "http://prefixed:8000"),
        ("APP__LOG_FILTER", "upload_client=debug"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.server_url, "http://prefixed:8000");
    assert_eq!(settings.log_filter, "upload_client=debug");
}

#[test]
fn server_url_is_normalized() {
    assert_eq!(
        normalize_server_url("  http://localhost:8000/ ").expect("normalize"),
        "http://localhost:8000"
    );
    assert_eq!(
        normalize_server_url("").expect("normalize"),
        Settings::default().server_url
    );
    assert!(normalize_server_url("ftp://localhost").is_err());
    assert!(normalize_server_url("not a url").is_err());
}

#[test]
fn explicit_missing_config_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("uploader_missing_{suffix}.toml"));
    assert!(load_settings(Some(&missing), None).is_err());
}

#[test]
fn cli_override_wins_over_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("uploader_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("uploader.toml");
    fs::write(&path, "server_url = \"http://from-file:8000\"\n").expect("write");

    let settings =
        load_settings(Some(&path), Some("https://from-cli.example/")).expect("load");
    assert_eq!(settings.server_url, "https://from-cli.example");

    fs::remove_dir_all(temp_root).expect("cleanup");
}
