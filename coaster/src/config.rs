//! Application configuration management.
//!
//! Configuration is layered from default values, an optional TOML file and
//! environment variables. Command-line flags are applied on top by the
//! individual commands.

use coaster_core::models::Symbol;
use coaster_csv::config::CsvConfig;
use coaster_plot::config::PlotConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// Name of the independent variable in every formula
    #[serde(default)]
    pub variable: Symbol,

    /// How the CSV input is read
    #[serde(default)]
    pub csv: CsvConfig,

    /// How curves are drawn
    #[serde(default)]
    pub plot: PlotConfig,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given on the command line
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `APP_<SECTION>__<KEY>` to `<section>.<key>`, e.g.
    ///
    /// ```bash
    /// export APP_VARIABLE=t
    /// export APP_CSV__DELIMITER=";"
    /// export APP_PLOT__SAMPLES=1000
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // APP_PLOT__STROKE_WIDTH maps to plot.stroke_width
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.variable.name(), "x");
        assert_eq!(config.csv.delimiter, ',');
        assert_eq!(config.plot.samples, 300);
        assert_eq!(config.plot.width, 1280);
        assert_eq!(config.plot.height, 720);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = env::temp_dir().join(format!("coaster-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            "variable = \"t\"\n\n[plot]\nsamples = 50\ntitle = \"Loop\"\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path));
        fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        assert_eq!(config.variable.name(), "t");
        assert_eq!(config.plot.samples, 50);
        assert_eq!(config.plot.title.as_deref(), Some("Loop"));
        assert_eq!(config.plot.width, 1280);
        assert_eq!(config.csv, CsvConfig::default());
    }

    #[test]
    fn missing_files_are_errors() {
        let path = Path::new("does/not/exist.toml");
        assert!(AppConfig::load(Some(path)).is_err());
    }
}
