//! Challenge tuning loaded from a JSON file.
use std::path::{Path, PathBuf};

use number_challenge_game::{ChallengeConfig, ConfigError, ConfigLoader, DefaultConfigLoader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Reads a [`ChallengeConfig`] document from disk.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    path: PathBuf,
}

impl FileConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigLoader for FileConfigLoader {
    type Error = ConfigFileError;

    fn load_config(&self) -> Result<ChallengeConfig, Self::Error> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ConfigFileError::Io {
            path: self.path.clone(),
            source,
        })?;
        ChallengeConfig::from_json(&raw).map_err(|source| ConfigFileError::Invalid {
            path: self.path.clone(),
            source,
        })
    }
}

/// Load tuning from `path`, or the built-in defaults when no path is given.
pub fn load_challenge_config(path: Option<&Path>) -> anyhow::Result<ChallengeConfig> {
    let cfg = match path {
        Some(path) => {
            let loader = FileConfigLoader::new(path);
            log::info!("loading config from {}", loader.path().display());
            loader.load_config()?
        }
        None => DefaultConfigLoader.load_config()?,
    };
    Ok(cfg)
}
