use std::collections::HashMap;
use std::path::PathBuf;
use webhost::config::{CONFIG_ENV, Config, PORT_ENV, PermitRelease, ROOT_ENV};

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::load_with(env(&[])).unwrap();

    assert_eq!(cfg.server.port, 80);
    assert_eq!(cfg.server.max_simultaneous_connections, 20);
    assert!(cfg.server.bind_local_addresses);
    assert_eq!(cfg.server.permit_release, PermitRelease::OnAccept);
    assert_eq!(cfg.website.root, PathBuf::from("./Website"));
    assert_eq!(cfg.session.expiration_secs, 60);
    assert_eq!(cfg.session.validation_token_name, "__CSRFToken__");
    assert_eq!(cfg.session.sweep_interval_secs, None);
}

#[test]
fn test_config_env_overrides() {
    let cfg = Config::load_with(env(&[(PORT_ENV, "8081"), (ROOT_ENV, "/srv/site")])).unwrap();

    assert_eq!(cfg.server.port, 8081);
    assert_eq!(cfg.website.root, PathBuf::from("/srv/site"));
}

#[test]
fn test_config_rejects_bad_port() {
    assert!(Config::load_with(env(&[(PORT_ENV, "eighty")])).is_err());
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml_str(
        "server:\n  port: 9000\n  permit_release: on_completion\nsession:\n  sweep_interval_secs: 30\n",
    )
    .unwrap();

    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.permit_release, PermitRelease::OnCompletion);
    assert_eq!(cfg.server.max_simultaneous_connections, 20);
    assert_eq!(cfg.session.sweep_interval_secs, Some(30));
    assert_eq!(cfg.session.expiration_secs, 60);
}

#[test]
fn test_config_file_then_env() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("webhost.yaml");
    std::fs::write(&file, "server:\n  port: 9000\nwebsite:\n  root: /from/file\n").unwrap();

    let cfg = Config::load_with(env(&[
        (CONFIG_ENV, file.to_str().unwrap()),
        (PORT_ENV, "9100"),
    ]))
    .unwrap();

    assert_eq!(cfg.server.port, 9100);
    assert_eq!(cfg.website.root, PathBuf::from("/from/file"));
}

#[test]
fn test_config_missing_file_is_an_error() {
    assert!(Config::load_with(env(&[(CONFIG_ENV, "/nonexistent/webhost.yaml")])).is_err());
}

#[test]
fn test_config_validation() {
    let mut cfg = Config::default();
    cfg.server.max_simultaneous_connections = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.session.expiration_secs = 0;
    assert!(cfg.validate().is_err());

    assert!(Config::default().validate().is_ok());
}
