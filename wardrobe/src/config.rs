use crate::domain::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{instrument, trace};

pub const ENV_DATA_DIR: &str = "WARDROBE_DATA_DIR";
pub const ENV_VOCABULARY: &str = "WARDROBE_VOCABULARY";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Directory holding the persisted collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Optional TOML file overriding the built-in tag vocabularies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_file: Option<PathBuf>,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/wardrobe")
}

fn default_data_dir() -> PathBuf {
    config_dir().join("data")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            vocabulary_file: None,
        }
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// Load settings from config files and environment variables
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(DomainError::Other(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            read_settings(path)?
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                read_settings(&path)?
            } else {
                Settings::default()
            }
        }
    };

    // Override with environment variables
    if let Ok(data_dir) = std::env::var(ENV_DATA_DIR) {
        trace!("Using {} from environment: {}", ENV_DATA_DIR, data_dir);
        settings.data_dir = expand_path(&data_dir)?;
    }

    if let Ok(vocabulary) = std::env::var(ENV_VOCABULARY) {
        trace!("Using {} from environment: {}", ENV_VOCABULARY, vocabulary);
        settings.vocabulary_file = Some(expand_path(&vocabulary)?);
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

fn read_settings(path: &Path) -> DomainResult<Settings> {
    trace!("Loading config from: {:?}", path);
    let text = std::fs::read_to_string(path)?;
    let mut settings: Settings = toml::from_str(&text).map_err(|e| {
        DomainError::Validation(format!("Invalid config file {}: {}", path.display(), e))
    })?;
    settings.data_dir = expand_path(&settings.data_dir.to_string_lossy())?;
    if let Some(vocabulary) = settings.vocabulary_file.take() {
        settings.vocabulary_file = Some(expand_path(&vocabulary.to_string_lossy())?);
    }
    Ok(settings)
}

/// Expand `~` and environment variables such as `$HOME` or `${XDG_DATA_HOME}`
fn expand_path(path: &str) -> DomainResult<PathBuf> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| DomainError::Validation(format!("Cannot expand path {}: {}", path, e)))
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}
