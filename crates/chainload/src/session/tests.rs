//! Tests for the resolution session.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use serial_test::serial;
use tempfile::TempDir;

use super::{ChainloadSetup, SettingsSource};
use crate::error::ChainloadError;
use crate::loader::{FileFormat, SettingsLoader};
use crate::settings::Settings;

fn write_settings(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn inline(content: &str) -> Settings {
    serde_yaml::from_str(content).unwrap()
}

#[test]
fn test_defaults() {
    let session = ChainloadSetup::default().build().unwrap();
    assert!(session.attempt_fallback());
    assert_eq!(session.prefix(), Some(""));
    assert!(session.extra_options().is_empty());
    assert!(session.last_value().is_none());
}

#[test]
fn test_reserved_extra_option_is_rejected() {
    let mut options = BTreeMap::new();
    options.insert("filename".to_string(), Value::from("__break__"));

    let result = ChainloadSetup::default().with_extra_options(options).build();
    match result {
        Err(ChainloadError::ReservedOption { name }) => assert_eq!(name, "filename"),
        other => panic!("Expected ReservedOption, got {other:?}"),
    }
}

#[test]
fn test_long_form_reserved_names_are_rejected() {
    for name in ["environment_variable_prefix", "file_object", "extra_options_dict"] {
        let result = ChainloadSetup::default()
            .with_extra_option(name, true)
            .build();
        assert!(
            matches!(result, Err(ChainloadError::ReservedOption { .. })),
            "{name} should be reserved"
        );
    }
}

#[test]
fn test_extra_options_are_exposed() {
    let session = ChainloadSetup::default()
        .with_extra_option("service_name", "billing")
        .build()
        .unwrap();
    assert_eq!(
        session.extra_option("service_name"),
        Some(&Value::from("billing"))
    );
    assert!(session.extra_option("missing").is_none());
}

#[test]
#[serial]
fn test_get_uses_prefixed_fallback() {
    temp_env::with_var("webapp_environment", Some("debug"), || {
        let session = ChainloadSetup::from_settings(inline("environment: production\n"))
            .with_prefix("webapp_")
            .build()
            .unwrap();

        assert_eq!(session.get("environment").unwrap(), Value::from("debug"));
        assert_eq!(session.last_value(), Some(Value::from("debug")));
    });
}

#[test]
#[serial]
fn test_override_prefix_replaces_session_prefix() {
    temp_env::with_vars(
        [
            ("svc_a_port", Some("1000")),
            ("svc_b_port", Some("2000")),
        ],
        || {
            let session = ChainloadSetup::default()
                .with_prefix("svc_a_")
                .build()
                .unwrap();

            assert_eq!(
                session.get_value(None, Some("port"), "80", None).unwrap(),
                Value::from("1000")
            );
            assert_eq!(
                session
                    .get_value(None, Some("port"), "80", Some("svc_b_"))
                    .unwrap(),
                Value::from("2000")
            );
        },
    );
}

#[test]
#[serial]
fn test_fallback_can_be_disabled() {
    temp_env::with_var("environment", Some("testing"), || {
        let session = ChainloadSetup::from_settings(inline("environment: production\n"))
            .with_attempt_fallback(false)
            .build()
            .unwrap();

        assert_eq!(
            session
                .get_value(Some("environment"), Some("_CHAINLOAD_UNSET_DECLARED"), "debug", None)
                .unwrap(),
            Value::from("production")
        );
    });
}

#[test]
fn test_file_object_is_loaded_once() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(temp_dir.path(), "settings.yaml", "environment: production\n");

    let session = ChainloadSetup::from_file(&path).build().unwrap();
    let first = session.file_object().unwrap();

    // Changing the file after the first load has no effect.
    write_settings(temp_dir.path(), "settings.yaml", "environment: changed\n");
    let second = session.file_object().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.get("environment"), Some(&Value::from("production")));
}

#[test]
fn test_file_object_without_source_is_empty_and_uncached() {
    let session = ChainloadSetup::new(SettingsSource::None).build().unwrap();
    let first = session.file_object().unwrap();
    let second = session.file_object().unwrap();
    assert!(first.is_empty());
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_file_object_is_shared_across_threads() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(temp_dir.path(), "settings.yaml", "workers: 4\n");
    let session = Arc::new(ChainloadSetup::from_file(&path).build().unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let session = Arc::clone(&session);
            std::thread::spawn(move || session.file_object().unwrap())
        })
        .collect();
    let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for settings in &loaded[1..] {
        assert!(Arc::ptr_eq(&loaded[0], settings));
    }
}

#[test]
fn test_search_root_and_parser_config() {
    let temp_dir = TempDir::new().unwrap();
    write_settings(temp_dir.path(), "settings.json", r#"{"workers": 4}"#);

    let session = ChainloadSetup::from_file("settings.json")
        .with_search_root(temp_dir.path())
        .with_parser_config(FileFormat::Json)
        .build()
        .unwrap();

    assert_eq!(session.loader().format(), FileFormat::Json);
    assert_eq!(
        session
            .get_value(Some("workers"), None, 1, None)
            .unwrap()
            .as_u64(),
        Some(4)
    );
}

#[test]
fn test_parse_failure_propagates_and_is_not_cached() {
    let temp_dir = TempDir::new().unwrap();
    write_settings(temp_dir.path(), "settings.yaml", "key: [unterminated\n");

    let session = ChainloadSetup::from_file("settings.yaml")
        .with_loader(SettingsLoader::new().with_search_root(temp_dir.path()))
        .build()
        .unwrap();

    let err = session.get("key").unwrap_err();
    assert!(err.is_parse_failure());

    write_settings(temp_dir.path(), "settings.yaml", "key: fixed\n");
    assert_eq!(session.get("key").unwrap(), Value::from("fixed"));
}

#[test]
#[serial]
fn test_get_parsed_converts_env_strings() {
    temp_env::with_var("_CHAINLOAD_PORT", Some("8080"), || {
        let session = ChainloadSetup::from_settings(inline("port: 80\nservice_name: api\n"))
            .build()
            .unwrap();

        let port: u16 = session
            .get_parsed(Some("port"), Some("_CHAINLOAD_PORT"), 0)
            .unwrap();
        assert_eq!(port, 8080);

        let name: String = session.get_parsed(Some("service_name"), None, "x").unwrap();
        assert_eq!(name, "api");
    });
}

#[test]
fn test_get_parsed_reports_bad_values() {
    let session = ChainloadSetup::from_settings(inline("port: not-a-port\n"))
        .without_prefix()
        .with_attempt_fallback(false)
        .build()
        .unwrap();

    let err = session
        .get_parsed::<u16>(Some("port"), None, 0)
        .unwrap_err();
    match err {
        ChainloadError::Convert { option, .. } => assert_eq!(option, "port"),
        other => panic!("Expected Convert, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_load_dotenv_respects_disable_gate() {
    let temp_dir = TempDir::new().unwrap();
    let env_path = write_settings(temp_dir.path(), ".env", "_CHAINLOAD_DOTENV_KEY=loaded\n");

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", Some("1")),
            ("_CHAINLOAD_DOTENV_KEY", None),
        ],
        || {
            ChainloadSetup::default()
                .load_dotenv_from(&env_path)
                .unwrap();
            assert!(std::env::var("_CHAINLOAD_DOTENV_KEY").is_err());
        },
    );

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None),
            ("_CHAINLOAD_DOTENV_KEY", None::<&str>),
        ],
        || {
            let session = ChainloadSetup::default()
                .load_dotenv_from(&env_path)
                .unwrap()
                .build()
                .unwrap();
            assert_eq!(
                session
                    .get_value(None, Some("_CHAINLOAD_DOTENV_KEY"), "unset", None)
                    .unwrap(),
                Value::from("loaded")
            );
        },
    );
}

#[test]
#[serial]
fn test_load_dotenv_missing_file_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    temp_env::with_var("DOTENV_DISABLED", None::<&str>, || {
        let result = ChainloadSetup::default().load_dotenv_from(temp_dir.path().join(".env"));
        assert!(result.is_ok());
    });
}

#[test]
#[serial]
fn test_load_dotenv_parse_error_hides_content() {
    let temp_dir = TempDir::new().unwrap();
    let env_path = write_settings(temp_dir.path(), ".env", "SECRET_VALUE hunter2\n");

    temp_env::with_var("DOTENV_DISABLED", None::<&str>, || {
        let err = ChainloadSetup::default()
            .load_dotenv_from(&env_path)
            .unwrap_err();
        assert!(matches!(err, ChainloadError::DotenvParse { .. }));
        assert!(!err.to_string().contains("hunter2"));
    });
}
