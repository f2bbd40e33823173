//! Building the app from a config file.

use std::time::Duration;

use abacus_config::AbacusConfig;
use abacus_engine::{App, KeypadMode, ServiceStatus};

use crate::common::{mount_health, start_calculator_mock};

#[tokio::test]
async fn config_file_points_app_at_service_and_history_dir() {
    let server = start_calculator_mock().await;
    mount_health(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[service]\nurl = \"{}\"\nconnect_timeout_secs = 2\n\n[app]\nkeypad = \"scientific\"\nascii_only = true\n\n[history]\ndir = \"{}\"\n",
            server.uri(),
            data_dir.display()
        ),
    )
    .unwrap();

    let config = AbacusConfig::load_from(&config_path).unwrap().unwrap();
    assert_eq!(config.connect_timeout(), Duration::from_secs(2));
    assert_eq!(config.history_dir(), Some(data_dir));

    let mut app = App::from_config(Some(&config)).unwrap();
    assert_eq!(app.service_status(), &ServiceStatus::Checking);
    assert_eq!(app.view().keypad, KeypadMode::Scientific);
    assert!(app.ui_options().ascii_only);

    app.settle().await;
    assert_eq!(
        app.service_status(),
        &ServiceStatus::Online {
            version: Some("1.0.0".to_string())
        }
    );
}

#[tokio::test]
async fn unreachable_service_reports_offline() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();
    let config = AbacusConfig::parse(&format!(
        "[service]\nurl = \"http://127.0.0.1:{port}\"\n\n[history]\ndir = \"{}\"\n",
        dir.path().display()
    ))
    .unwrap();

    let mut app = App::from_config(Some(&config)).unwrap();
    app.settle().await;
    assert_eq!(app.service_status(), &ServiceStatus::Offline);
}

#[test]
fn missing_config_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = AbacusConfig::load_from(&dir.path().join("config.toml")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn malformed_config_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[service\nurl = 3").unwrap();

    let err = AbacusConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), path.as_path());
}
