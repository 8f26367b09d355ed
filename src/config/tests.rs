//! Tests for config functionality.

use crate::config::{Buffering, Config, DecodeErrors, Newline};
use crate::error::LockStreamError;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.block);
    assert!(!config.delete);
    assert_eq!(config.buffering, Buffering::Default);
    assert!(!config.line_buffering);
    assert!(config.encoding.is_none());
    assert!(config.errors.is_none());
    assert!(config.newline.is_none());
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
block: false
delete: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert!(!config.block);
    assert!(config.delete);
    // Unspecified values should use defaults
    assert_eq!(config.buffering, Buffering::Default);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
block: true
delete: false
buffering: line
line_buffering: true
encoding: UTF-8
errors: replace
newline: crlf
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.buffering, Buffering::Line);
    assert!(config.line_buffering);
    assert_eq!(config.encoding.as_deref(), Some("UTF-8"));
    assert_eq!(config.errors, Some(DecodeErrors::Replace));
    assert_eq!(config.newline, Some(Newline::Crlf));
}

#[test]
fn test_buffering_accepts_sizes_and_names() {
    let config = Config::from_yaml("buffering: 4096").unwrap();
    assert_eq!(config.buffering, Buffering::Size(4096));

    let config = Config::from_yaml("buffering: 0").unwrap();
    assert_eq!(config.buffering, Buffering::Unbuffered);

    let config = Config::from_yaml("buffering: unbuffered").unwrap();
    assert_eq!(config.buffering, Buffering::Unbuffered);

    let config = Config::from_yaml("buffering: 1").unwrap();
    assert_eq!(config.buffering, Buffering::Line);
    assert_eq!(config.buffering, "1".parse::<Buffering>().unwrap());

    let config = Config::from_yaml("buffering: \"1\"").unwrap();
    assert_eq!(config.buffering, Buffering::Line);
}

#[test]
fn test_invalid_buffering_name_rejected() {
    let result = Config::from_yaml("buffering: lots");
    assert!(matches!(result, Err(LockStreamError::Config(_))));
}

#[test]
fn test_unknown_fields_ignored() {
    let yaml = r#"
block: false
future_option: 42
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert!(!config.block);
}

#[test]
fn test_unsupported_encoding_rejected() {
    let result = Config::from_yaml("encoding: latin-1");
    let err = result.unwrap_err();
    assert!(matches!(err, LockStreamError::InvalidArgument(_)));
    assert!(err.to_string().contains("latin-1"));
}

#[test]
fn test_utf8_spellings_accepted() {
    for name in ["utf-8", "UTF8", "utf_8", "Utf-8"] {
        let config = Config {
            encoding: Some(name.to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_ok(), "{name} should be accepted");
    }
}

#[test]
fn test_zero_buffer_size_rejected() {
    let config = Config {
        buffering: Buffering::Size(0),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(LockStreamError::InvalidArgument(_))
    ));
}

#[test]
fn test_yaml_round_trip_keeps_values() {
    let config = Config {
        block: false,
        buffering: Buffering::Size(512),
        newline: Some(Newline::Untranslated),
        ..Config::default()
    };

    let yaml = config.to_yaml().unwrap();
    assert!(yaml.contains("buffering: 512"));
    assert!(!yaml.contains("encoding"));

    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lockstream.yaml");
    std::fs::write(&path, "delete: true\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.delete);
}

#[test]
fn test_load_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let result = Config::load(temp_dir.path().join("missing.yaml"));

    let err = result.unwrap_err();
    assert!(matches!(err, LockStreamError::Config(_)));
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_newline_from_python_style_strings() {
    assert_eq!("".parse::<Newline>().unwrap(), Newline::Untranslated);
    assert_eq!("\r\n".parse::<Newline>().unwrap(), Newline::Crlf);
    assert_eq!("cr".parse::<Newline>().unwrap(), Newline::Cr);
    assert!("\t".parse::<Newline>().is_err());
}

#[test]
fn test_text_option_name() {
    assert_eq!(Config::default().text_option_name(), None);

    let config = Config {
        errors: Some(DecodeErrors::Ignore),
        ..Config::default()
    };
    assert_eq!(config.text_option_name(), Some("errors"));
}
