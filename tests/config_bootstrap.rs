//! Configuration bootstrap tests.

use tempfile::TempDir;

use funceble_worker::config::{
    bootstrap, load_override_layer, merge_layers, CheckerConfig, ConfigLayer,
    OVERWRITE_CONFIG_FILE,
};
use funceble_worker::error_handling::ConfigurationError;

fn layer(yaml: &str) -> ConfigLayer {
    ConfigLayer::from_yaml_str(yaml).unwrap()
}

#[test]
fn test_later_layers_win() {
    let merged = merge_layers(&layer("{}"), &layer("a: 1\nb: 2\n"), &layer("b: 3\nc: 4\n"));
    assert_eq!(merged, layer("a: 1\nb: 3\nc: 4\n"));
}

#[test]
fn test_malformed_override_equals_empty_override() {
    let malformed = TempDir::new().unwrap();
    std::fs::write(
        malformed.path().join(OVERWRITE_CONFIG_FILE),
        "lookup: [unclosed\n  timeout: :\n",
    )
    .unwrap();

    let empty = TempDir::new().unwrap();
    std::fs::write(empty.path().join(OVERWRITE_CONFIG_FILE), "").unwrap();

    let absent = TempDir::new().unwrap();

    assert!(load_override_layer(malformed.path()).is_empty());
    assert_eq!(
        bootstrap(malformed.path()).unwrap(),
        bootstrap(empty.path()).unwrap()
    );
    assert_eq!(
        bootstrap(empty.path()).unwrap(),
        bootstrap(absent.path()).unwrap()
    );
}

#[test]
fn test_override_file_applies_but_mandatory_values_win() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(OVERWRITE_CONFIG_FILE),
        "lookup:\n  timeout: 30\n  netinfo: true\ncli_testing:\n  whois_db: true\nuser_agent:\n  browser: firefox\n",
    )
    .unwrap();

    let committed = bootstrap(dir.path()).unwrap();
    let checker = committed.checker();
    assert_eq!(checker.lookup.timeout, 5);
    assert!(!checker.cli_testing.whois_db);
    assert!(checker.lookup.netinfo);
    assert_eq!(checker.user_agent.browser, "firefox");
    // Untouched sections keep their defaults
    assert_eq!(checker.http_codes, CheckerConfig::default().http_codes);
}

#[test]
fn test_unknown_keys_are_kept_in_the_tree() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(OVERWRITE_CONFIG_FILE),
        "custom_section:\n  answer: 42\n",
    )
    .unwrap();

    let committed = bootstrap(dir.path()).unwrap();
    assert!(committed
        .tree()
        .contains_key(serde_yaml::Value::from("custom_section")));
}

#[test]
fn test_ill_typed_override_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(OVERWRITE_CONFIG_FILE),
        "lookup:\n  dns: \"sometimes\"\n",
    )
    .unwrap();

    let err = bootstrap(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigurationError::Invalid(_)));
}
