//! Configuration: defaults, the YAML file and `ALFRED_*` environment overrides
//!
//! Precedence, lowest first: built-in defaults, `~/.alfred-cli/config.yaml`,
//! environment variables.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost";
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;
pub const DEFAULT_MODEL: &str = "llama3.2";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that generates terminal \
commands based on the user's query and the provided environment context. Use the environment \
information (platform, current directory, OS, shell) to generate accurate and \
platform-appropriate commands. For Windows, generate PowerShell or cmd.exe commands. For macOS \
and Linux, generate bash/sh commands. If multiple steps are needed, generate multiple commands \
separated by newlines (one command per line). Each command will be executed sequentially, so \
you can use separate commands for operations like changing directories. Only respond with the \
command(s), no explanations unless asked.";

pub const ENV_OLLAMA_URL: &str = "ALFRED_OLLAMA_URL";
pub const ENV_OLLAMA_PORT: &str = "ALFRED_OLLAMA_PORT";
pub const ENV_OLLAMA_MODEL: &str = "ALFRED_OLLAMA_MODEL";
pub const ENV_SYSTEM_PROMPT: &str = "ALFRED_SYSTEM_PROMPT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub system_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub url: String,
    pub port: u16,
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OLLAMA_URL.to_string(),
            port: DEFAULT_OLLAMA_PORT,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply overrides from `lookup`. Empty values are ignored, as is a port
    /// that does not parse.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(url) = get(ENV_OLLAMA_URL) {
            self.ollama.url = url;
        }

        if let Some(port) = get(ENV_OLLAMA_PORT) {
            match port.trim().parse::<u16>() {
                Ok(port) => self.ollama.port = port,
                Err(_) => tracing::warn!(
                    "Ignoring {}={:?}: not a port number",
                    ENV_OLLAMA_PORT,
                    port
                ),
            }
        }

        if let Some(model) = get(ENV_OLLAMA_MODEL) {
            self.ollama.model = model;
        }

        if let Some(prompt) = get(ENV_SYSTEM_PROMPT) {
            self.system_prompt = prompt;
        }

        self.ensure_system_prompt();
    }

    /// Fall back to the built-in prompt when none is configured.
    pub fn ensure_system_prompt(&mut self) {
        if self.system_prompt.is_empty() {
            self.system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
        }
    }

    /// Base URL of the Ollama server. A port of 0 means the default port.
    pub fn ollama_url(&self) -> String {
        let port = match self.ollama.port {
            0 => DEFAULT_OLLAMA_PORT,
            port => port,
        };
        format!("{}:{}", self.ollama.url.trim_end_matches('/'), port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.ollama.url, "http://localhost");
        assert_eq!(config.ollama.port, 11434);
        assert_eq!(config.ollama.model, "llama3.2");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.ollama_url(), "http://localhost:11434");
    }

    #[test]
    fn test_env_overrides_every_field() {
        let mut config = Config::new();
        config.apply_env_overrides(env(&[
            (ENV_OLLAMA_URL, "http://gpu-box"),
            (ENV_OLLAMA_PORT, "8080"),
            (ENV_OLLAMA_MODEL, "qwen2.5-coder"),
            (ENV_SYSTEM_PROMPT, "Answer with commands only."),
        ]));

        assert_eq!(config.ollama_url(), "http://gpu-box:8080");
        assert_eq!(config.ollama.model, "qwen2.5-coder");
        assert_eq!(config.system_prompt, "Answer with commands only.");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = Config::new();
        config.ollama.port = 9000;
        config.apply_env_overrides(env(&[(ENV_OLLAMA_PORT, "eleven")]));
        assert_eq!(config.ollama.port, 9000);

        config.apply_env_overrides(env(&[(ENV_OLLAMA_PORT, "70000")]));
        assert_eq!(config.ollama.port, 9000);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut config = Config::new();
        config.apply_env_overrides(env(&[(ENV_OLLAMA_MODEL, ""), (ENV_SYSTEM_PROMPT, "")]));
        assert_eq!(config.ollama.model, DEFAULT_MODEL);
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_empty_system_prompt_falls_back_to_default() {
        let mut config = Config::new();
        config.system_prompt.clear();
        config.apply_env_overrides(env(&[]));
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_zero_port_uses_default_port() {
        let mut config = Config::new();
        config.ollama.port = 0;
        config.ollama.url = "http://127.0.0.1/".to_string();
        assert_eq!(config.ollama_url(), "http://127.0.0.1:11434");
    }
}
