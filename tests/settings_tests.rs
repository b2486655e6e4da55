//! Settings tests
//!
//! These tests change process-wide environment variables and the working
//! directory, so they run serially.

use std::fs;
use std::path::Path;

use serial_test::serial;
use tempfile::TempDir;

use mxxn::errors::MxxnError;
use mxxn::settings::{SETTINGS_ENV, Settings};

fn write_settings(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("settings.ini");
    fs::write(&path, content).unwrap();
    path
}

/// Runs `f` with `MXXN_SETTINGS` set and removes it afterwards.
fn with_settings_env<T>(value: &Path, f: impl FnOnce() -> T) -> T {
    unsafe { std::env::set_var(SETTINGS_ENV, value) };
    let result = f();
    unsafe { std::env::remove_var(SETTINGS_ENV) };
    result
}

#[test]
#[serial]
fn test_settings_file_from_environment() {
    let dir = TempDir::new().unwrap();
    let app_path = dir.path().join("app");
    let data_path = dir.path().join("data");
    fs::create_dir_all(&app_path).unwrap();
    fs::create_dir_all(&data_path).unwrap();

    let file = write_settings(
        dir.path(),
        &format!(
            "[mxxn]\nenabled_mxns = ['mxnone', \"mxntwo\"]\napp_path = {}\ndata_path = {}\n",
            app_path.display(),
            data_path.display()
        ),
    );

    let settings = with_settings_env(&file, Settings::load).unwrap();

    assert_eq!(
        settings.enabled_mxns(),
        Some(&["mxnone".to_string(), "mxntwo".to_string()][..])
    );
    assert_eq!(settings.app_path(), app_path.as_path());
    assert_eq!(settings.data_path(), data_path.as_path());
    assert_eq!(
        settings.database.url,
        format!("sqlite://{}?mode=rwc", data_path.join("mxxn.db").display())
    );
}

#[test]
#[serial]
fn test_missing_settings_file_from_environment() {
    let dir = TempDir::new().unwrap();
    let result = with_settings_env(&dir.path().join("missing.ini"), Settings::file);

    assert!(matches!(result, Err(MxxnError::FileNotExist(_))));
}

#[test]
#[serial]
fn test_settings_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    write_settings(dir.path(), "[mxxn]\nenabled_mxns = []\n");

    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let file = Settings::file();
    let settings = Settings::load();
    std::env::set_current_dir(cwd).unwrap();

    assert!(file.unwrap().unwrap().ends_with("settings.ini"));
    let settings = settings.unwrap();
    assert_eq!(settings.enabled_mxns(), Some(&[][..]));
    assert!(settings.data_path().ends_with("data"));
}

#[test]
#[serial]
fn test_defaults_without_file() {
    let settings = Settings::from_file(None).unwrap();

    assert_eq!(settings.enabled_mxns(), None);
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.database.pool_size, 10);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_environment_overrides() {
    let dir = TempDir::new().unwrap();
    let file = write_settings(dir.path(), "[server]\nport = 9000\n");

    unsafe { std::env::set_var("MXXN__SERVER__HOST", "0.0.0.0") };
    let settings = Settings::from_file(Some(&file));
    unsafe { std::env::remove_var("MXXN__SERVER__HOST") };

    let settings = settings.unwrap();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9000);
}

#[test]
#[serial]
fn test_format_errors() {
    let dir = TempDir::new().unwrap();

    let file = write_settings(dir.path(), "[mxxn]\nenabled_mxns = mxnone\n");
    let err = Settings::from_file(Some(&file)).unwrap_err();
    assert!(matches!(err, MxxnError::SettingsFormat(_)));
    assert!(err.message().contains("\"enabled_mxns\""));
    assert!(err.message().contains("\"array\""));

    let file = write_settings(dir.path(), "[unknown]\nkey = 1\n");
    assert!(matches!(
        Settings::from_file(Some(&file)),
        Err(MxxnError::SettingsFormat(_))
    ));

    let file = write_settings(dir.path(), "[mxxn]\ncolor = red\n");
    assert!(matches!(
        Settings::from_file(Some(&file)),
        Err(MxxnError::SettingsFormat(_))
    ));
}

#[test]
#[serial]
fn test_missing_paths() {
    let dir = TempDir::new().unwrap();

    let file = write_settings(dir.path(), "[mxxn]\napp_path = /nonexistent/mxxn/app\n");
    let err = Settings::from_file(Some(&file)).unwrap_err();
    assert!(matches!(err, MxxnError::PathNotExist(_)));
    assert_eq!(err.message(), "The app_path from the settings file does not exist.");

    let file = write_settings(dir.path(), "[mxxn]\ndata_path = /nonexistent/mxxn/data\n");
    assert!(matches!(
        Settings::from_file(Some(&file)),
        Err(MxxnError::PathNotExist(_))
    ));
}
