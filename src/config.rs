/*!
 * Configuration support for the normalizer
 *
 * Provides runtime configuration options for customizing output formatting
 * and jurisdiction lookup.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::license::JurisdictionTable;

/// Configuration for the provider record normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Whether to pretty-print JSON output
    #[serde(default = "default_pretty_print")]
    pub pretty_print: bool,

    /// Extra issuer name → state code entries, checked before the built-in table
    #[serde(default)]
    pub issuer_aliases: BTreeMap<String, String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            pretty_print: default_pretty_print(),
            issuer_aliases: BTreeMap::new(),
        }
    }
}

// Default value functions for serde
fn default_pretty_print() -> bool {
    true
}

impl NormalizeConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `PVN_PRETTY_PRINT`: "true" or "false"
    /// - `PVN_ISSUER_ALIASES`: `Issuer Name=CODE;Other Issuer=CODE`
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Overlay environment variables on this configuration
    fn merge_env(mut self) -> Self {
        if let Ok(val) = std::env::var("PVN_PRETTY_PRINT") {
            self.pretty_print = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("PVN_ISSUER_ALIASES") {
            self.issuer_aliases.extend(parse_issuer_aliases(&val));
        }

        self
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| crate::NormalizeError::from(e).with_path(path))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| crate::NormalizeError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                suggestion: Some("Check that the file is valid TOML format".to_string()),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Serialize the configuration as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::NormalizeError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                suggestion: None,
            })
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/provider-normalize/config.toml` on Unix-like systems
    /// or `%APPDATA%\provider-normalize\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "provider-normalize")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, then environment overrides
    ///
    /// Priority order:
    /// 1. Environment variables
    /// 2. Default config file (if exists)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        let base = Self::default_config_path()
            .filter(|path| path.exists())
            .and_then(|path| match Self::from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                    None
                }
            })
            .unwrap_or_default();

        base.merge_env()
    }

    /// Issuer lookup table for this configuration
    pub fn jurisdiction_table(&self) -> JurisdictionTable {
        JurisdictionTable::with_aliases(
            self.issuer_aliases
                .iter()
                .map(|(issuer, code)| (issuer.clone(), code.clone())),
        )
    }
}

/// Parse `Name=CODE;Name=CODE` pairs, skipping malformed ones
fn parse_issuer_aliases(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| {
            let (issuer, code) = pair.split_once('=')?;
            let (issuer, code) = (issuer.trim(), code.trim());
            if issuer.is_empty() || code.is_empty() {
                None
            } else {
                Some((issuer.to_string(), code.to_string()))
            }
        })
        .collect()
}

/// Builder for customizing configuration
#[derive(Default)]
pub struct ConfigBuilder {
    config: NormalizeConfig,
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: NormalizeConfig::default(),
        }
    }

    /// Set pretty printing
    pub fn pretty_print(mut self, enabled: bool) -> Self {
        self.config.pretty_print = enabled;
        self
    }

    /// Add an issuer alias
    pub fn issuer_alias(mut self, issuer: impl Into<String>, state: impl Into<String>) -> Self {
        self.config.issuer_aliases.insert(issuer.into(), state.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> NormalizeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = NormalizeConfig::default();
        assert!(config.pretty_print);
        assert!(config.issuer_aliases.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .pretty_print(false)
            .issuer_alias("Medical Board of California", "CA")
            .build();

        assert!(!config.pretty_print);
        assert_eq!(
            config.jurisdiction_table().lookup("Medical Board of California"),
            Some("CA")
        );
    }

    #[test]
    fn test_toml_round_trip_with_missing_fields() {
        let config: NormalizeConfig = toml::from_str("[issuer_aliases]\n\"Guam Board\" = \"GU\"\n").unwrap();
        assert!(config.pretty_print);
        assert_eq!(config.issuer_aliases.get("Guam Board").map(String::as_str), Some("GU"));
    }

    #[test]
    fn test_parse_issuer_aliases() {
        let aliases = parse_issuer_aliases("Board A=AA; =XX;Board B = BB;junk");
        assert_eq!(
            aliases,
            vec![
                ("Board A".to_string(), "AA".to_string()),
                ("Board B".to_string(), "BB".to_string()),
            ]
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = ConfigBuilder::new().issuer_alias("Board A", "AA").build();
        config.save(&path).unwrap();
        assert_eq!(NormalizeConfig::from_file(&path).unwrap(), config);
    }
}
