//! TOML configuration file support.
//!
//! Defaults for `export` can be kept in a config file instead of flags:
//!
//! ```toml
//! # nanofinder.toml
//! [export]
//! spectral_units = "raman_shift"
//! save_mapcoords = true
//!
//! [batch]
//! dispatch = { threshold = 4 }
//! on_error = "skip"
//! ```
//!
//! Flags given on the command line take precedence.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use nanofinder::batch::BatchConfig;
use nanofinder::export::ExportOptions;

/// Root configuration structure for nanofinder.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Export settings.
    #[serde(default)]
    pub export: ExportOptions,

    /// Batch loading settings for directory inputs.
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanofinder::batch::{Dispatch, FailurePolicy};
    use nanofinder::units::SpectralUnit;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [export]
            spectral_units = "eV"
            save_mapcoords = true
            channel = 0
            filename = "map"

            [batch]
            dispatch = "parallel"
            on_error = "skip"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.export.spectral_units, Some(SpectralUnit::ElectronVolt));
        assert!(config.export.save_mapcoords);
        assert_eq!(config.export.filename.as_deref(), Some("map"));
        assert_eq!(config.batch.dispatch, Dispatch::Parallel);
        assert_eq!(config.batch.on_error, FailurePolicy::Skip);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [export]
            spectral_units = "cm-1"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.export.spectral_units, Some(SpectralUnit::Wavenumber));
        assert!(!config.export.save_mapcoords);
        assert_eq!(config.batch, BatchConfig::default());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.export, ExportOptions::default());
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let toml = r#"
            [export]
            spectral_units = "kelvin"
        "#;
        assert!(Config::from_str(toml).is_err());
    }
}
