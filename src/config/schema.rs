use crate::error::ConfigError;
use crate::render::DEFAULT_MAP_SEARCH_BASE;
use crate::transport::WireFormat;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub use crate::context::ContextConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub persona: PersonaConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub linkify: LinkifyConfig,

    #[serde(default)]
    pub transport: TransportConfig,
}

fn default_log_level() -> String {
    "info".into()
}

/// Who the assistant says it is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_persona_name")]
    pub name: String,
    #[serde(default = "default_persona_business")]
    pub business: String,
    /// What the assistant says when the site does not cover a question.
    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,
}

fn default_persona_name() -> String {
    "Hannah".into()
}

fn default_persona_business() -> String {
    "Secure Tax".into()
}

fn default_fallback_answer() -> String {
    "I’m not 100% sure from the website. Please contact Secure Tax or use the Contact Us page."
        .into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            business: default_persona_business(),
            fallback_answer: default_fallback_answer(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkifyConfig {
    /// Exact address strings turned into map links. Matching is literal.
    #[serde(default)]
    pub known_addresses: Vec<String>,
    #[serde(default = "default_map_search_base")]
    pub map_search_base: String,
}

fn default_map_search_base() -> String {
    DEFAULT_MAP_SEARCH_BASE.into()
}

impl Default for LinkifyConfig {
    fn default() -> Self {
        Self {
            known_addresses: Vec::new(),
            map_search_base: default_map_search_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Absolute URL of the chat endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub wire_format: WireFormat,
    /// Most recent turns sent with each request; 0 sends all of them.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Whole-request timeout. Unset leaves it to the network stack.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/chat".into()
}

fn default_history_limit() -> usize {
    12
}

impl TransportConfig {
    /// Snapshot limit for the conversation log.
    pub fn history_window(&self) -> Option<usize> {
        (self.history_limit > 0).then_some(self.history_limit)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            wire_format: WireFormat::default(),
            history_limit: default_history_limit(),
            timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".hannah").join("config.toml"),
            log_level: default_log_level(),
            persona: PersonaConfig::default(),
            context: ContextConfig::default(),
            linkify: LinkifyConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.endpoint.trim().is_empty() {
            return Err(ConfigError::Validation(
                "transport.endpoint must not be empty".into(),
            ));
        }
        if self.context.max_context_chars == 0 {
            return Err(ConfigError::Validation(
                "context.max_context_chars must be greater than 0".into(),
            ));
        }
        if self.context.max_links == 0 {
            return Err(ConfigError::Validation(
                "context.max_links must be greater than 0".into(),
            ));
        }
        if Url::parse(&self.linkify.map_search_base).is_err() {
            return Err(ConfigError::Validation(format!(
                "linkify.map_search_base '{}' is not a URL",
                self.linkify.map_search_base
            )));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Validation(format!(
                "log_level '{}' is not one of trace, debug, info, warn, error",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Load `~/.hannah/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let hannah_dir = home.join(".hannah");
        if !hannah_dir.exists() {
            fs::create_dir_all(&hannah_dir).context("Failed to create .hannah directory")?;
        }
        Self::load_from(&hannah_dir.join("config.toml"))
    }

    /// Load from an explicit path, creating it with defaults when missing.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// Env values are applied after the file is written, so they are never
    /// persisted, and before validation in both branches.
    fn load_with(config_path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path.to_path_buf();
            config
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("HANNAH_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.transport.endpoint = endpoint.trim().to_string();
            }
        }

        if let Some(limit) = lookup("HANNAH_HISTORY_LIMIT") {
            if let Ok(limit) = limit.trim().parse::<usize>() {
                self.transport.history_limit = limit;
            }
        }

        if let Some(level) = lookup("HANNAH_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.log_level = level.trim().to_string();
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
