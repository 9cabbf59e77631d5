//! Unit tests for configuration loading from files

use std::io::Write;
use std::path::Path;
use switchyard_core::{DefaultAction, FilterOperator, LogFormat, LogLevel, LogicOperator};
use switchyard_server::{load_config, parse_config, LoadError};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const VALID: &str = r#"
general:
  route_timeout: 7
  log_rotation: 200mb
server:
  host: 127.0.0.1
  port: 8123
  workers: 2
  log_level: critical
  log_format: json
filtering:
  default_action: pass
  conditions:
    logic: OR
    rules:
      - field: object.title
        operator: contains_any
        value: [disk, memory]
      - field: code
        operator: less_than
        value: 500
routes:
  - field: code
    mappings:
      404: http://notfound.local/hook
      "500": http://errors.local/hook
"#;

#[test]
fn test_load_valid_file() {
    let file = write_config(VALID);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.general.route_timeout, 7);
    assert_eq!(config.general.log_rotation.as_deref(), Some("200mb"));
    assert_eq!(config.server.port, 8123);
    assert_eq!(config.server.log_level, LogLevel::Critical);
    assert_eq!(config.server.log_format, LogFormat::Json);
    assert_eq!(config.filtering.default_action, DefaultAction::Pass);
    assert_eq!(config.filtering.logic(), LogicOperator::Or);
    assert_eq!(config.filtering.rules()[0].operator, FilterOperator::ContainsAny);
}

#[test]
fn test_unquoted_numeric_route_keys_are_strings() {
    let config = parse_config(VALID).unwrap();
    let route = &config.routes[0];

    assert_eq!(route.lookup("404"), Some("http://notfound.local/hook"));
    assert_eq!(route.lookup("500"), Some("http://errors.local/hook"));
}

#[test]
fn test_example_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.example.yaml");
    let config = load_config(&path).unwrap();

    assert_eq!(config.routes.len(), 2);
    assert_eq!(config.filtering.rules().len(), 2);
}

#[test]
fn test_missing_routes_section_fails_to_parse() {
    let yaml = VALID.split("routes:").next().unwrap();
    let err = parse_config(yaml).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn test_operator_value_mismatch_rejected() {
    let yaml = VALID.replace("value: [disk, memory]", "value: disk");
    let err = parse_config(&yaml).unwrap_err();

    match err {
        LoadError::Invalid(inner) => {
            assert_eq!(inner.field(), "filtering.conditions.rules[0].value")
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn test_invalid_field_path_rejected() {
    let yaml = VALID.replace("field: object.title", "field: object..title");
    assert!(matches!(parse_config(&yaml), Err(LoadError::Parse(_))));
}

#[test]
fn test_invalid_destination_rejected() {
    let yaml = VALID.replace("http://errors.local/hook", "errors.local/hook");
    assert!(matches!(parse_config(&yaml), Err(LoadError::Invalid(_))));
}

#[test]
fn test_empty_rules_rejected() {
    let yaml = r#"
general:
  route_timeout: 1
filtering:
  conditions:
    logic: AND
    rules: []
routes:
  - field: a
    mappings:
      b: http://c.local/
"#;
    let err = parse_config(yaml).unwrap_err();
    assert!(err.to_string().contains("filtering.conditions.rules"));
}

#[test]
fn test_malformed_log_rotation_rejected() {
    let yaml = VALID.replace("log_rotation: 200mb", "log_rotation: invalid");
    match parse_config(&yaml).unwrap_err() {
        LoadError::Invalid(inner) => assert_eq!(inner.field(), "general.log_rotation"),
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn test_unknown_operator_rejected() {
    let yaml = VALID.replace("operator: less_than", "operator: between");
    assert!(matches!(parse_config(&yaml), Err(LoadError::Parse(_))));
}
