//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use sitescope_core::config::{
    CliConfigOverrides, ConfigSource, LayeredConfig, ENV_MODE, ENV_RADIUS_KM,
    ENV_RURAL_THRESHOLD, ENV_THRESHOLD_M,
};
use sitescope_core::models::{ClassificationMode, ThresholdOverrides};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [ENV_RADIUS_KM, ENV_THRESHOLD_M, ENV_MODE, ENV_RURAL_THRESHOLD] {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file(
        r#"
threshold_m = 50.0
# Only override the co-location threshold
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.threshold_m.value, 50.0);
    assert_eq!(config.threshold_m.source, ConfigSource::File);
    assert_eq!(config.radius_km.value, 2.0);
    assert_eq!(config.radius_km.source, ConfigSource::Default);
    assert_eq!(config.mode.source, ConfigSource::Default);
}

#[test]
fn test_malformed_toml_is_rejected() {
    let file = config_file("radius_km = [not toml");
    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var(ENV_RADIUS_KM, "3.5");
    env::set_var(ENV_MODE, "THRESHOLD");
    env::set_var(ENV_RURAL_THRESHOLD, "4");

    let file = config_file(
        r#"
radius_km = 1.0
mode = "quantile"

[thresholds]
rural = 8.0
urban = 300.0
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.radius_km.value, 3.5);
    assert_eq!(config.radius_km.source, ConfigSource::Environment);
    assert_eq!(config.mode.value, ClassificationMode::Threshold);
    assert_eq!(config.rural.value, 4.0);
    assert_eq!(config.rural.source, ConfigSource::Environment);
    assert_eq!(config.urban.value, 300.0);
    assert_eq!(config.urban.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var(ENV_THRESHOLD_M, "a lot");
    env::set_var(ENV_MODE, "kmeans");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.threshold_m.value, 100.0);
    assert_eq!(config.threshold_m.source, ConfigSource::Default);
    assert_eq!(config.mode.value, ClassificationMode::Quantile);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    env::set_var(ENV_RADIUS_KM, "3.5");

    let file = config_file("radius_km = 1.0");

    let mut config =
        LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        radius_km: Some(0.5),
        thresholds: ThresholdOverrides { suburban: Some(20.0), ..Default::default() },
        ..Default::default()
    });

    assert_eq!(config.radius_km.value, 0.5);
    assert_eq!(config.radius_km.source, ConfigSource::Cli);
    assert_eq!(config.suburban.value, 20.0);

    let params = config.pipeline_params();
    assert_eq!(params.radius_km, 0.5);
    assert!(params.validate().is_ok());

    clear_env();
}
