use serde::{Deserialize, Serialize};
use shroud_core::{HostCapabilities, RunOptions};
use std::path::{Path, PathBuf};

/// Configuration for shroud (config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Text of the confidentiality banner
    #[serde(default = "default_banner")]
    pub banner: String,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub classifiers: ClassifiersConfig,
}

/// Run options used when the command line does not set them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_true")]
    pub insert_header: bool,

    #[serde(default = "default_true")]
    pub enable_tracking: bool,
}

/// Features the file-backed host reports as supported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_true")]
    pub change_tracking: bool,

    #[serde(default = "default_true")]
    pub hyperlinks: bool,

    #[serde(default = "default_true")]
    pub headers: bool,

    #[serde(default = "default_true")]
    pub literal_special_glyphs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassifiersConfig {
    /// Require a valid Luhn checksum for credit-card matches
    #[serde(default)]
    pub card_luhn_check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            banner: default_banner(),
            defaults: DefaultsConfig::default(),
            host: HostConfig::default(),
            classifiers: ClassifiersConfig::default(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            insert_header: true,
            enable_tracking: true,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            change_tracking: true,
            hyperlinks: true,
            headers: true,
            literal_special_glyphs: true,
        }
    }
}

fn default_banner() -> String {
    "CONFIDENTIAL - Contains redacted information".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if config.banner.trim().is_empty() {
            anyhow::bail!("banner in {} must not be empty", path.display());
        }
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "shroud", "shroud") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.shroud/config.toml")
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            insert_header: self.defaults.insert_header,
            enable_tracking: self.defaults.enable_tracking,
        }
    }

    pub fn capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            change_tracking: self.host.change_tracking,
            hyperlinks: self.host.hyperlinks,
            headers: self.host.headers,
        }
    }
}
