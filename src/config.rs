use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration for the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Max tracing level: `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Collection the `create.character` handler writes into.
    #[serde(default = "default_collection")]
    pub character_collection: String,

    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_collection() -> String {
    "characters".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            character_collection: default_collection(),
            config_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load `~/.agentflow/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        let dir = home.join(".agentflow");
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Self::load_from(dir.join("config.toml"))
    }

    /// Load from an explicit path, writing defaults if the file is absent.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str::<Self>(&contents)
                .map_err(|e| ConfigError::Load(e.to_string()))?
        } else {
            let config = Self::default();
            config.save_to(&path)?;
            config
        };
        config.config_path = path;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("AGENTFLOW_LOG_LEVEL") {
            if !level.is_empty() {
                self.log_level = level;
            }
        }
        if let Ok(collection) = std::env::var("AGENTFLOW_COLLECTION") {
            if !collection.is_empty() {
                self.character_collection = collection;
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&self.config_path)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let toml_str =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Save(e.to_string()))?;
        fs::write(path, toml_str)?;
        Ok(())
    }
}
