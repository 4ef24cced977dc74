use std::collections::HashMap;
use std::path::PathBuf;

use chart_mcp::api::{
    CONFIG_PATH_ENV, DISPLAY_ENV, DPI_ENV, DisplayMode, LAYOUT_SEED_ENV, OUTPUT_DIR_ENV,
    ServerConfig,
};
use chart_mcp::core::LayoutSeedPolicy;
use chart_mcp::{ChartError, ErrorKind};

fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ChartError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    ServerConfig::load_with(|key| vars.get(key).cloned())
}

#[test]
fn defaults_without_environment() {
    let config = load(&[]).expect("config");
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.dpi, 300);
    assert_eq!(config.output_dir, std::env::temp_dir());
    assert_eq!(config.layout_seed, LayoutSeedPolicy::Fixed { seed: 42 });
    assert_eq!(config.display, DisplayMode::Auto);
}

#[test]
fn environment_overrides_apply() {
    let config = load(&[
        (OUTPUT_DIR_ENV, " /srv/charts "),
        (DPI_ENV, "150"),
        (DISPLAY_ENV, "headless"),
        (LAYOUT_SEED_ENV, "per-request"),
    ])
    .expect("config");

    assert_eq!(config.output_dir, PathBuf::from("/srv/charts"));
    assert_eq!(config.dpi, 150);
    assert_eq!(config.display, DisplayMode::Headless);
    assert_eq!(config.layout_seed, LayoutSeedPolicy::PerRequest);
}

#[test]
fn display_override_can_name_a_viewer() {
    let config = load(&[(DISPLAY_ENV, "feh")]).expect("config");
    assert_eq!(
        config.display,
        DisplayMode::Command {
            program: "feh".to_owned()
        }
    );
}

#[test]
fn integer_layout_seed_is_fixed() {
    let config = load(&[(LAYOUT_SEED_ENV, "7")]).expect("config");
    assert_eq!(config.layout_seed, LayoutSeedPolicy::Fixed { seed: 7 });

    let config = load(&[(LAYOUT_SEED_ENV, "unseeded")]).expect("config");
    assert_eq!(config.layout_seed, LayoutSeedPolicy::Unseeded);
}

#[test]
fn bad_values_are_config_errors() {
    for vars in [
        [(DPI_ENV, "high")],
        [(DPI_ENV, "10")],
        [(LAYOUT_SEED_ENV, "sometimes")],
        [(DISPLAY_ENV, "  ")],
    ] {
        let err = load(&vars).expect_err("invalid override");
        assert!(matches!(err, ChartError::InvalidConfig(_)), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

#[test]
fn json_file_is_read_before_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart-mcp.json");
    std::fs::write(
        &path,
        r#"{
            "output_dir": "/var/charts",
            "dpi": 96,
            "layout_iterations": 20,
            "display": { "mode": "command", "program": "eog" }
        }"#,
    )
    .expect("write config");
    let path = path.to_string_lossy().into_owned();

    let config = load(&[(CONFIG_PATH_ENV, path.as_str()), (DPI_ENV, "200")]).expect("config");

    assert_eq!(config.output_dir, PathBuf::from("/var/charts"));
    assert_eq!(config.dpi, 200);
    assert_eq!(config.layout_iterations, 20);
    assert_eq!(config.layout_params().iterations, 20);
    assert_eq!(
        config.display,
        DisplayMode::Command {
            program: "eog".to_owned()
        }
    );
}

#[test]
fn unknown_json_fields_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart-mcp.json");
    std::fs::write(&path, r#"{ "dpi": 96, "colour": "red" }"#).expect("write config");

    let err = ServerConfig::from_json_file(&path).expect_err("unknown field");
    assert!(matches!(err, ChartError::InvalidConfig(_)), "{err:?}");
}

#[test]
fn missing_json_file_is_a_config_error() {
    let err = load(&[(CONFIG_PATH_ENV, "/definitely/not/here.json")]).expect_err("missing");
    assert!(matches!(err, ChartError::InvalidConfig(_)), "{err:?}");
}
