//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::entities::SYNC_TRIGGER;

/// Party Parrot catalog root
pub const DEFAULT_CATALOG_URL: &str = "https://raw.githubusercontent.com/jmhobbs/cultofthepartyparrot.com/main/";

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub mattermost: MattermostConfig,
    pub command: CommandConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MattermostConfig {
    pub site_url: String,
    pub access_token: Option<String>,
    /// Team the slash command is registered in
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommandConfig {
    pub trigger: String,
    pub description: String,
    /// Public URL Mattermost posts slash command requests to
    pub callback_url: Option<String>,
    /// Expected verification token; filled from registration when absent
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub listen: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CatalogConfig {
    pub base_url: String,
}

impl Default for MattermostConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:8065".to_string(),
            access_token: None,
            team_id: None,
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            trigger: SYNC_TRIGGER.to_string(),
            description: "Sync Party Parrots emojis".to_string(),
            callback_url: None,
            token: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Load from `path` when it exists, fall back to defaults, then apply the environment
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.with_env())
    }

    /// Override settings from environment variables
    pub fn with_env(self) -> Self {
        self.with_vars(|key| std::env::var(key).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("MATTERMOST_URL") {
            self.mattermost.site_url = url;
        }
        if let Some(token) = var("MATTERMOST_TOKEN") {
            self.mattermost.access_token = Some(token);
        }
        if let Some(team) = var("MATTERMOST_TEAM_ID") {
            self.mattermost.team_id = Some(team);
        }
        if let Some(url) = var("PARROTS_CALLBACK_URL") {
            self.command.callback_url = Some(url);
        }
        if let Some(token) = var("PARROTS_COMMAND_TOKEN") {
            self.command.token = Some(token);
        }
        if let Some(listen) = var("PARROTS_LISTEN") {
            self.server.listen = listen;
        }
        self
    }

    /// Access token, if one is set and non-empty
    pub fn access_token(&self) -> Option<&str> {
        self.mattermost
            .access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mattermost.site_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue("mattermost.site-url is empty".to_string()));
        }
        if self.command.trigger.trim().is_empty() || self.command.trigger.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "command.trigger is not a single word: {:?}",
                self.command.trigger
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.command.trigger, "partyparrotssync");
        assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_URL);
        assert!(config.access_token().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "mattermost:\n  site-url: https://chat.example.com\n  access-token: abc123\n",
        )
        .unwrap();
        assert_eq!(config.mattermost.site_url, "https://chat.example.com");
        assert_eq!(config.access_token(), Some("abc123"));
        assert_eq!(config.server.listen, "0.0.0.0:8080");
    }

    #[test]
    fn test_blank_token_is_unconfigured() {
        let config = Config::from_yaml("mattermost:\n  access-token: '  '\n").unwrap();
        assert!(config.access_token().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MATTERMOST_URL", "https://mm.internal"),
            ("MATTERMOST_TOKEN", "tok"),
            ("PARROTS_LISTEN", "127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().with_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.mattermost.site_url, "https://mm.internal");
        assert_eq!(config.access_token(), Some("tok"));
        assert_eq!(config.server.listen, "127.0.0.1:9000");
        assert!(config.mattermost.team_id.is_none());
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("site-url"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.command.trigger, "partyparrotssync");
    }

    #[test]
    fn test_invalid_trigger() {
        let mut config = Config::default();
        config.command.trigger = "party parrots".to_string();
        assert!(config.validate().is_err());
    }
}
