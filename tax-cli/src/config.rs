use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tax_core::SourceConfig;

use crate::args::FIRST_TAX_YEAR;

/// Settings read from the optional TOML file.
///
/// ```toml
/// first_year = 2016
///
/// [source]
/// url_template = "https://mirror.example.org/{year}.html"
/// timeout_secs = 10
/// ```
///
/// Every key is optional; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    /// Earliest year the configured source publishes. Never below
    /// [`FIRST_TAX_YEAR`].
    pub first_year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            first_year: FIRST_TAX_YEAR,
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid configuration")?;

        if !config.source.url_template.contains(SourceConfig::YEAR_PLACEHOLDER) {
            bail!(
                "source.url_template '{}' has no {} placeholder",
                config.source.url_template,
                SourceConfig::YEAR_PLACEHOLDER
            );
        }
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when no file was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Applies command-line overrides.
    pub fn with_timeout(
        mut self,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(timeout_secs) = timeout_secs {
            self.source.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn check_year(
        &self,
        year: i32,
    ) -> Result<()> {
        let first = self.first_year.max(FIRST_TAX_YEAR);
        if year < first {
            bail!("the configured source has no bracket page before {first}, got {year}");
        }
        Ok(())
    }
}
