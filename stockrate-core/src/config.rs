//! Report configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! working configuration. Command-line flags override what is loaded here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub plot: PlotConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Symbol list to read.
    pub path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/stocks.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub filename: String,
    /// Rank the table ascending by rate.
    pub sort: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(crate::export::DEFAULT_OUTPUT_DIR),
            filename: "successful_symbols.csv".into(),
            sort: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub enabled: bool,
    /// Write a PNG instead of opening the terminal view.
    pub save: bool,
    pub filename: String,
    pub bar_width: f64,
    pub font_size: f64,
    pub dpi: u32,
    pub results_dir: PathBuf,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            save: false,
            filename: "plot.png".into(),
            bar_width: 0.6,
            font_size: 3.0,
            dpi: 700,
            results_dir: PathBuf::from("results"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
        }
    }
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.filename.trim().is_empty() {
            return Err(ConfigError::Invalid("output.filename is empty".into()));
        }
        if !(self.plot.bar_width > 0.0 && self.plot.bar_width <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "plot.bar_width must be in (0, 1], got {}",
                self.plot.bar_width
            )));
        }
        if self.plot.font_size <= 0.0 {
            return Err(ConfigError::Invalid("plot.font_size must be positive".into()));
        }
        if self.plot.dpi == 0 {
            return Err(ConfigError::Invalid("plot.dpi must be positive".into()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.output.dir, PathBuf::from("data"));
        assert_eq!(config.plot.dpi, 700);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = ReportConfig::from_toml(
            r#"
[input]
path = "data/topix_core30.csv"

[plot]
enabled = true
save = true
dpi = 150
"#,
        )
        .unwrap();
        assert_eq!(config.input.path, PathBuf::from("data/topix_core30.csv"));
        assert!(config.plot.save);
        assert_eq!(config.plot.dpi, 150);
        assert_eq!(config.plot.bar_width, 0.6);
        assert!(config.output.sort);
    }

    #[test]
    fn rejects_bad_bar_width() {
        let err = ReportConfig::from_toml("[plot]\nbar_width = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("bar_width"));
    }

    #[test]
    fn rejects_unparsable_toml() {
        assert!(matches!(
            ReportConfig::from_toml("[plot\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
