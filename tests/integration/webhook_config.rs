use std::path::PathBuf;

use devup::{config::WebhookConfig, lib::errors::ConfigError};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn three_tokens_combine_into_the_services_url() {
    let webhook = WebhookConfig::load_from_path(&fixture_path("slack_valid.ini"), "slack")
        .expect("slack_valid.ini should load");
    assert_eq!(
        webhook.url,
        "https://hooks.slack.com/services/TAAAA/BBBBB/s3cret"
    );
}

#[test]
fn missing_section_is_a_configuration_error() {
    let error = WebhookConfig::load_from_path(&fixture_path("slack_missing_section.ini"), "slack")
        .expect_err("missing [slack] section must fail");

    match error {
        ConfigError::MissingSection { section, .. } => assert_eq!(section, "slack"),
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[test]
fn missing_ini_file_is_a_read_error() {
    let error = WebhookConfig::load_from_path(&fixture_path("no_such.ini"), "slack")
        .expect_err("missing INI file must fail");
    assert!(matches!(error, ConfigError::FileRead { .. }));
}
