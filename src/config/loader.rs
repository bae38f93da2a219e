use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use super::Config;

/// Directory under the home directory that holds the config file.
pub const CONFIG_DIR: &str = ".alfred-cli";
pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to get home directory")]
    HomeDir,

    #[error("error reading config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reads [`Config`] from a YAML file and layers environment overrides on top.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    required: bool,
}

impl ConfigLoader {
    /// Loader for `~/.alfred-cli/config.yaml`. The file is optional.
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDir)?;
        Ok(Self {
            path: default_config_path(&home),
            required: false,
        })
    }

    /// Loader for a file named on the command line. The file must exist.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file, then apply `ALFRED_*` variables from the environment.
    pub async fn load(&self) -> Result<Config, ConfigError> {
        self.load_with(|key| std::env::var(key).ok()).await
    }

    /// Load the file, then apply overrides from `lookup`.
    pub async fn load_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Config, ConfigError> {
        let mut config = self.read_file().await?;
        config.apply_env_overrides(lookup);
        Ok(config)
    }

    async fn read_file(&self) -> Result<Config, ConfigError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !self.required => {
                debug!("No config file at {}, using defaults", self.path.display());
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }
}

pub fn default_config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = default_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn optional(path: PathBuf) -> ConfigLoader {
        ConfigLoader {
            path,
            required: false,
        }
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(
            default_config_path(Path::new("/home/ana")),
            PathBuf::from("/home/ana/.alfred-cli/config.yaml")
        );
    }

    #[tokio::test]
    async fn test_missing_optional_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let loader = optional(default_config_path(temp.path()));

        let config = loader.load_with(no_env).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::explicit(temp.path().join("nope.yaml"));

        let err = loader.load_with(no_env).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "ollama:\n  url: http://10.0.0.5\n");

        let config = optional(path).load_with(no_env).await.unwrap();
        assert_eq!(config.ollama_url(), "http://10.0.0.5:11434");
        assert_eq!(config.ollama.model, DEFAULT_MODEL);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_full_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            "ollama:\n  url: http://gpu\n  port: 8000\n  model: mistral\nsystem_prompt: Be brief.\n",
        );

        let config = optional(path).load_with(no_env).await.unwrap();
        assert_eq!(config.ollama_url(), "http://gpu:8000");
        assert_eq!(config.ollama.model, "mistral");
        assert_eq!(config.system_prompt, "Be brief.");
    }

    #[tokio::test]
    async fn test_env_wins_over_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "ollama:\n  model: mistral\n");

        let config = optional(path)
            .load_with(|key| (key == "ALFRED_OLLAMA_MODEL").then(|| "phi3".to_string()))
            .await
            .unwrap();
        assert_eq!(config.ollama.model, "phi3");
    }

    #[tokio::test]
    async fn test_empty_system_prompt_in_file_falls_back() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "system_prompt: \"\"\n");

        let config = optional(path).load_with(no_env).await.unwrap();
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_empty_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "\n");

        let config = optional(path).load_with(no_env).await.unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "ollama: [not, a, map\n");

        let err = optional(path).load_with(no_env).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("error parsing config file"));
    }
}
