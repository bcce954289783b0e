use std::fs;
use std::io::Write;
use std::path::PathBuf;

use dirs_next as dirs;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_REPOSITORY: &str = "bookshelf";
pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image repository whose tags are compared.
    pub repository: String,
    /// Docker-compatible CLI used for `image inspect`.
    pub runtime: String,
    /// Directory that receives charts and the HTML report.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: DEFAULT_REPOSITORY.to_string(),
            runtime: DEFAULT_RUNTIME.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let path = config_file_path()?;
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        let path = config_file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = fs::File::create(path)?;
        let contents = toml::to_string_pretty(self)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Apply command-line overrides on top of the loaded file.
    pub fn with_overrides(
        mut self,
        repository: Option<String>,
        runtime: Option<String>,
        output_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(repository) = repository {
            self.repository = repository;
        }
        if let Some(runtime) = runtime {
            self.runtime = runtime;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.repository.trim().is_empty() {
            return Err(AppError::config("repository must not be empty"));
        }
        // A registry host may carry a port; only the last path segment is checked.
        let name = self.repository.rsplit('/').next().unwrap_or_default();
        if name.contains(':') {
            return Err(AppError::config(format!(
                "repository '{}' must not include a tag",
                self.repository
            )));
        }
        if self.runtime.trim().is_empty() {
            return Err(AppError::config("runtime must not be empty"));
        }
        Ok(())
    }
}

pub fn config_file_path() -> Result<PathBuf, AppError> {
    let config_root = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| {
            AppError::config("Unable to determine configuration directory for this platform")
        })?;
    Ok(config_root.join("imgsize").join("config.toml"))
}

pub fn ensure_config_file() -> Result<PathBuf, AppError> {
    let path = config_file_path()?;
    if !path.exists() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let default = Config::default();
        let contents = toml::to_string_pretty(&default)?;
        fs::write(&path, contents)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: Config = toml::from_str("repository = \"shop\"\n").unwrap();
        assert_eq!(config.repository, "shop");
        assert_eq!(config.runtime, DEFAULT_RUNTIME);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let config = Config::default().with_overrides(None, Some("podman".into()), None);
        assert_eq!(config.runtime, "podman");
        assert_eq!(config.repository, DEFAULT_REPOSITORY);
    }

    #[test]
    fn tagged_repository_is_rejected() {
        let config = Config::default().with_overrides(Some("shop:latest".into()), None, None);
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
        assert!(Config::default().validate().is_ok());
        let registry = Config::default().with_overrides(Some("localhost:5000/shop".into()), None, None);
        assert!(registry.validate().is_ok());
    }
}
