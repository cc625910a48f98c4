//! Shell configuration: loading, saving, and default values.
//!
//! The config file lives at `~/.config/webdock/config.yaml` (XDG convention)
//! and is written back with defaults on first run.

use crate::defaults;
use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Shell engine configuration.
///
/// Every field has a serde default so configs from older versions load
/// cleanly. Durations are stored in milliseconds to keep the YAML flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name given to the space created in a fresh workspace.
    #[serde(default = "defaults::space_name")]
    pub default_space_name: String,

    /// Icon name given to newly created spaces.
    #[serde(default = "defaults::space_icon")]
    pub default_space_icon: String,

    /// Label given to the tab group created with a new space.
    #[serde(default = "defaults::group_label")]
    pub default_group_label: String,

    /// Title given to tabs created without an explicit title.
    #[serde(default = "defaults::tab_title")]
    pub default_tab_title: String,

    /// URL loaded by tabs created without an explicit URL.
    #[serde(default = "defaults::tab_url")]
    pub default_tab_url: String,

    /// Interval between readiness probes of a loading document.
    #[serde(default = "defaults::ready_poll_interval_ms")]
    pub ready_poll_interval_ms: u64,

    /// Deadline after which a loading document is shown regardless.
    #[serde(default = "defaults::ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    /// Minimum rendered body height for content to count as visible.
    #[serde(default = "defaults::min_content_height")]
    pub min_content_height: f32,

    /// Floor on a split pane's share of the total, in percent.
    #[serde(default = "defaults::min_ratio_percent")]
    pub min_ratio_percent: f32,

    /// Width in pixels of the drag handle between split panes.
    #[serde(default = "defaults::divider_width")]
    pub divider_width: f32,

    /// Override for the directory holding persisted workspace state.
    /// `None` uses `~/.config/webdock/state/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_space_name: defaults::space_name(),
            default_space_icon: defaults::space_icon(),
            default_group_label: defaults::group_label(),
            default_tab_title: defaults::tab_title(),
            default_tab_url: defaults::tab_url(),
            ready_poll_interval_ms: defaults::ready_poll_interval_ms(),
            ready_timeout_ms: defaults::ready_timeout_ms(),
            min_content_height: defaults::min_content_height(),
            min_ratio_percent: defaults::min_ratio_percent(),
            divider_width: defaults::divider_width(),
            state_dir: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default URL for new tabs
    pub fn with_default_tab_url(mut self, url: impl Into<String>) -> Self {
        self.default_tab_url = url.into();
        self
    }

    /// Set the readiness polling interval in milliseconds
    pub fn with_ready_poll_interval(mut self, ms: u64) -> Self {
        self.ready_poll_interval_ms = ms;
        self
    }

    /// Set the readiness deadline in milliseconds
    pub fn with_ready_timeout(mut self, ms: u64) -> Self {
        self.ready_timeout_ms = ms;
        self
    }

    /// Set the minimum pane share in percent
    pub fn with_min_ratio_percent(mut self, percent: f32) -> Self {
        self.min_ratio_percent = percent;
        self
    }

    /// Set the state directory override
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// Validate field values, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ready_poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "ready_poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.ready_timeout_ms < self.ready_poll_interval_ms {
            return Err(ConfigError::Validation(
                "ready_timeout_ms must be at least ready_poll_interval_ms".to_string(),
            ));
        }
        if !(0.0..50.0).contains(&self.min_ratio_percent) {
            return Err(ConfigError::Validation(format!(
                "min_ratio_percent must be in [0, 50), got {}",
                self.min_ratio_percent
            )));
        }
        if self.divider_width < 0.0 {
            return Err(ConfigError::Validation(format!(
                "divider_width must not be negative, got {}",
                self.divider_width
            )));
        }
        Ok(())
    }

    /// Load configuration from file or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            log::info!("Loading existing config from {:?}", config_path);
            let contents = fs::read_to_string(&config_path).map_err(ConfigError::Io)?;
            let config: Config = serde_yaml_ng::from_str(&contents).map_err(ConfigError::Parse)?;
            config.validate()?;
            Ok(config)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save() {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::Parse)?;
        fs::write(&config_path, yaml).map_err(ConfigError::Io)?;

        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("webdock").join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // Use XDG convention on all platforms: ~/.config/webdock/config.yaml
            if let Some(home_dir) = dirs::home_dir() {
                home_dir
                    .join(".config")
                    .join("webdock")
                    .join("config.yaml")
            } else {
                PathBuf::from("config.yaml")
            }
        }
    }

    /// Directory where persisted workspace state is kept.
    pub fn state_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.state_dir {
            return dir.clone();
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("webdock")
            .join("state")
    }
}
