use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{LayoutSeedPolicy, SpringLayoutParams};
use crate::error::{ChartError, ChartResult};

use super::{DEFAULT_DPI, DisplayMode};

pub const CONFIG_PATH_ENV: &str = "CHART_MCP_CONFIG";
pub const OUTPUT_DIR_ENV: &str = "CHART_MCP_OUTPUT_DIR";
pub const DPI_ENV: &str = "CHART_MCP_DPI";
pub const DISPLAY_ENV: &str = "CHART_MCP_DISPLAY";
pub const LAYOUT_SEED_ENV: &str = "CHART_MCP_LAYOUT_SEED";

pub const MIN_DPI: u32 = 36;
pub const MAX_DPI: u32 = 1200;

/// Runtime settings of the tool server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub output_dir: PathBuf,
    pub dpi: u32,
    pub layout_seed: LayoutSeedPolicy,
    pub layout_iterations: usize,
    pub layout_optimal_distance: f64,
    pub display: DisplayMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let layout = SpringLayoutParams::default();
        Self {
            output_dir: std::env::temp_dir(),
            dpi: DEFAULT_DPI,
            layout_seed: LayoutSeedPolicy::default(),
            layout_iterations: layout.iterations,
            layout_optimal_distance: layout.optimal_distance,
            display: DisplayMode::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults that never open a viewer; used by tests and batch tools.
    #[must_use]
    pub fn headless(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            display: DisplayMode::Headless,
            ..Self::default()
        }
    }

    /// Reads the optional JSON file named by `CHART_MCP_CONFIG`, then applies
    /// the `CHART_MCP_*` environment overrides.
    pub fn load() -> ChartResult<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::load`] with an explicit variable lookup.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> ChartResult<Self> {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_json_file(path.trim())?,
            _ => Self::default(),
        };

        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(dpi) = lookup(DPI_ENV) {
            config.dpi = dpi.trim().parse().map_err(|err| {
                ChartError::InvalidConfig(format!("{DPI_ENV}=`{dpi}` is not an integer: {err}"))
            })?;
        }
        if let Some(display) = lookup(DISPLAY_ENV) {
            config.display = DisplayMode::parse(&display)?;
        }
        if let Some(seed) = lookup(LAYOUT_SEED_ENV) {
            config.layout_seed = parse_layout_seed(&seed)?;
        }

        config.validate()?;
        debug!(?config, "loaded server config");
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ChartError::InvalidConfig(format!("cannot read `{}`: {err}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|err| {
            ChartError::InvalidConfig(format!("cannot parse `{}`: {err}", path.display()))
        })
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            return Err(ChartError::InvalidConfig(format!(
                "dpi must be in [{MIN_DPI}, {MAX_DPI}], got {}",
                self.dpi
            )));
        }
        if self.layout_iterations == 0 {
            return Err(ChartError::InvalidConfig(
                "layout_iterations must be > 0".to_owned(),
            ));
        }
        if !self.layout_optimal_distance.is_finite() || self.layout_optimal_distance <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "layout_optimal_distance must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn layout_params(&self) -> SpringLayoutParams {
        SpringLayoutParams {
            iterations: self.layout_iterations,
            optimal_distance: self.layout_optimal_distance,
        }
    }
}

/// `unseeded`, `per-request` or an integer seed.
pub fn parse_layout_seed(value: &str) -> ChartResult<LayoutSeedPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "unseeded" | "random" => Ok(LayoutSeedPolicy::Unseeded),
        "per-request" | "per_request" => Ok(LayoutSeedPolicy::PerRequest),
        other => other
            .parse()
            .map(|seed| LayoutSeedPolicy::Fixed { seed })
            .map_err(|_| {
                ChartError::InvalidConfig(format!(
                    "{LAYOUT_SEED_ENV}=`{value}` must be `unseeded`, `per-request` or an integer"
                ))
            }),
    }
}
