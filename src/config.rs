//! Configuration management for host-control
//!
//! Config file location:
//! - Linux: ~/.config/host-control/config.toml
//! - macOS: ~/Library/Application Support/com.host-control.host-control/config.toml
//! - Windows: %APPDATA%/host-control/host-control/config/config.toml
//!
//! You can override the config location by setting `HOST_CONTROL_CONFIG_PATH`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::os::ToolPaths;

pub const CONFIG_PATH_ENV: &str = "HOST_CONTROL_CONFIG_PATH";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Executables used for administrative commands and GPU queries
    #[serde(default)]
    pub tools: ToolPaths,

    /// Diagnostic logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(config_path, toml)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        let proj_dirs = ProjectDirs::from("com", "host-control", "host-control")
            .context("Could not determine project directories")?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Load the config, writing the defaults out if no file exists yet
    pub fn init() -> Result<Self> {
        let config_path = Self::config_path()?;
        let config = Self::load_from(&config_path)?;

        if !config_path.exists() {
            config.save_to(&config_path)?;
        }

        Ok(config)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tools.shutdown, "shutdown");
        assert_eq!(config.tools.pnputil, "pnputil");
        assert_eq!(config.tools.powercfg, "powercfg");
        assert_eq!(config.tools.nvidia_smi, "nvidia-smi");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_config_serialization() {
        let toml = toml::to_string(&Config::default()).unwrap();

        assert!(toml.contains("[tools]"));
        assert!(toml.contains("nvidia_smi"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("level"));
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_keys() {
        let config: Config = toml::from_str(
            r#"
            [tools]
            nvidia_smi = 'C:\Program Files\NVIDIA Corporation\NVSMI\nvidia-smi.exe'
            "#,
        )
        .unwrap();

        assert_eq!(
            config.tools.nvidia_smi,
            "C:\\Program Files\\NVIDIA Corporation\\NVSMI\\nvidia-smi.exe"
        );
        assert_eq!(config.tools.shutdown, "shutdown");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.tools.powercfg = "C:\\Windows\\System32\\powercfg.exe".to_string();
        config.logging.level = "host_control=debug".to_string();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tools\nshutdown = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }
}
