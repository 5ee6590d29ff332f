//! Configuration file handling.
//!
//! Settings come from an optional `rate-explorer.toml`; command-line values
//! override them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::engine::request::{ChartRequest, ViewOptions};

pub const DEFAULT_CONFIG_FILE: &str = "rate-explorer.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

/// Dataset location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// File loaded at startup (csv, json or parquet).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Chart settings and the selection each panel starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_rate_bins")]
    pub rate_bins: usize,

    /// Plot the rate histogram on a log10 y axis.
    #[serde(default = "default_true")]
    pub log_scale_rate: bool,

    #[serde(default = "default_histogram")]
    pub histogram: String,

    #[serde(default = "default_boxplot")]
    pub boxplot: String,

    #[serde(default = "default_lines")]
    pub lines: String,

    #[serde(default = "default_map")]
    pub map: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rate_bins: default_rate_bins(),
            log_scale_rate: true,
            histogram: default_histogram(),
            boxplot: default_boxplot(),
            lines: default_lines(),
            map: default_map(),
        }
    }
}

fn default_rate_bins() -> usize {
    50
}

fn default_true() -> bool {
    true
}

fn default_histogram() -> String {
    "#hist/rate".to_string()
}

fn default_boxplot() -> String {
    "#box/none".to_string()
}

fn default_lines() -> String {
    "#line/age".to_string()
}

fn default_map() -> String {
    "#map/median".to_string()
}

/// The four initial panel selections, validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialViews {
    pub histogram: ChartRequest,
    pub boxplot: ChartRequest,
    pub lines: ChartRequest,
    pub map: ChartRequest,
}

impl ViewConfig {
    pub fn options(&self) -> ViewOptions {
        ViewOptions {
            rate_bins: self.rate_bins.max(1),
        }
    }

    /// Parse the configured routes, checking each belongs to its panel.
    pub fn initial_views(&self) -> Result<InitialViews> {
        let parse = |route: &str,
                     panel: &str,
                     ok: fn(&ChartRequest) -> bool|
         -> Result<ChartRequest> {
            let request = ChartRequest::from_route(route)
                .with_context(|| format!("invalid {panel} route in config"))?;
            anyhow::ensure!(ok(&request), "route '{route}' is not a {panel} view");
            Ok(request)
        };

        Ok(InitialViews {
            histogram: parse(&self.histogram, "histogram", |r| {
                matches!(r, ChartRequest::Histogram(_))
            })?,
            boxplot: parse(&self.boxplot, "boxplot", |r| {
                matches!(r, ChartRequest::BoxPlot(_))
            })?,
            lines: parse(&self.lines, "lines", |r| matches!(r, ChartRequest::Lines(_)))?,
            map: parse(&self.map, "map", |r| matches!(r, ChartRequest::Map(_)))?,
        })
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the explicit `--config` file, else `rate-explorer.toml` if it
    /// exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            log::debug!("Using {DEFAULT_CONFIG_FILE}");
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(path) = &args.data {
            self.data.path = Some(path.clone());
        }
        if let Some(bins) = args.bins {
            self.view.rate_bins = bins;
        }
    }

    /// Default configuration rendered as TOML, for `--init-config`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("serializing default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::selection::{Dimension, HistogramTarget, Statistic};

    #[test]
    fn test_defaults_match_dashboard_start() {
        let views = ViewConfig::default().initial_views().unwrap();
        assert_eq!(views.histogram, ChartRequest::Histogram(HistogramTarget::Rate));
        assert_eq!(views.boxplot, ChartRequest::BoxPlot(None));
        assert_eq!(views.lines, ChartRequest::Lines(Dimension::Age));
        assert_eq!(views.map, ChartRequest::Map(Statistic::Median));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r##"
            [data]
            path = "rates.csv"

            [view]
            map = "#map/std"
            "##,
        )
        .unwrap();
        assert_eq!(config.data.path, Some(PathBuf::from("rates.csv")));
        assert_eq!(config.view.rate_bins, 50);
        assert!(config.view.log_scale_rate);
        assert_eq!(
            config.view.initial_views().unwrap().map,
            ChartRequest::Map(Statistic::Std)
        );
    }

    #[test]
    fn test_route_for_wrong_panel_is_rejected() {
        let view = ViewConfig {
            lines: "#map/mean".to_string(),
            ..ViewConfig::default()
        };
        let err = view.initial_views().unwrap_err();
        assert!(err.to_string().contains("not a lines view"));
    }

    #[test]
    fn test_bogus_route_is_rejected() {
        let view = ViewConfig {
            map: "#map/bogus".to_string(),
            ..ViewConfig::default()
        };
        assert!(view.initial_views().is_err());
    }

    #[test]
    fn test_default_toml_round_trips() {
        let text = Config::default_toml().unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_zero_bins_clamped() {
        let view = ViewConfig {
            rate_bins: 0,
            ..ViewConfig::default()
        };
        assert_eq!(view.options().rate_bins, 1);
    }
}
