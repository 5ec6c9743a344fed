use std::path::{Path, PathBuf};

use log::debug;
use ndrexpr::config::DecoderConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DumpError, DumpResult};

/// Environment variable overriding the configuration file location.
pub const ENV_CONFIG_PATH: &str = "NDREXPR_CONFIG_PATH";

/// Contents of the `config.toml` file.
///
/// ```toml
/// [decoder]
/// max_depth = 64
/// ```
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    pub decoder: DecoderConfig,
}

impl DumpConfig {
    /// Get the default path to the configuration file.
    pub fn default_path() -> PathBuf {
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push("ndrexpr");
        path.push("config.toml");
        path
    }

    pub fn from_toml_str(toml_str: &str, file: &Path) -> DumpResult<Self> {
        toml::from_str(toml_str).map_err(|e| DumpError::ConfigParseError {
            source: e,
            file: file.display().to_string(),
        })
    }

    /// Load the configuration from `path`.
    pub fn load_from_toml(path: &Path) -> DumpResult<Self> {
        let toml_str = std::fs::read_to_string(path).map_err(|e| DumpError::IoError {
            source: e,
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&toml_str, path)
    }

    /// Load `explicit` if given, otherwise the default file if it exists, otherwise defaults.
    pub fn resolve(explicit: Option<&Path>) -> DumpResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_toml(path);
        }

        let path = Self::default_path();
        if path.is_file() {
            debug!("Loading configuration from {}", path.display());
            Self::load_from_toml(&path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
