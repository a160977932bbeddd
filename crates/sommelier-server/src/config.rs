//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use sommelier_agent::AgentConfig;
use sommelier_voice::LlmConfig;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LLM provider (chat, speech, transcription).
    #[serde(default)]
    pub llm: LlmConfig,

    /// Agent platform integration.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Browser UI delivery.
    #[serde(default)]
    pub static_files: StaticConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "sommelier_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Location of the voice UI pages and assets.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            dir: default_static_dir(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides (see [`apply_env_overrides`]).
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
///
/// - `HOST`, `PORT` override `server.host` / `server.port`
/// - `LOG_LEVEL`, `LOG_JSON` ("true" or "1") override `logging.*`
/// - `CHATGPT_API_KEY`, `LLM_BASE_URL` override `llm.api_key` / `llm.base_url`
/// - `SALESFORCE_DOMAIN`, `SALESFORCE_CONSUMER_KEY`,
///   `SALESFORCE_CONSUMER_SECRET`, `SALESFORCE_AGENT_ID`,
///   `SALESFORCE_API_VERSION` override `agent.*`
/// - `STATIC_DIR` overrides `static_files.dir`
///
/// Unparseable `HOST`/`PORT` values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    if let Some(key) = lookup("CHATGPT_API_KEY") {
        config.llm.api_key = key;
    }
    if let Some(url) = lookup("LLM_BASE_URL") {
        config.llm.base_url = url;
    }

    if let Some(domain) = lookup("SALESFORCE_DOMAIN") {
        config.agent.domain = domain;
    }
    if let Some(key) = lookup("SALESFORCE_CONSUMER_KEY") {
        config.agent.client_id = key;
    }
    if let Some(secret) = lookup("SALESFORCE_CONSUMER_SECRET") {
        config.agent.client_secret = secret;
    }
    if let Some(agent_id) = lookup("SALESFORCE_AGENT_ID") {
        config.agent.agent_id = agent_id;
    }
    if let Some(version) = lookup("SALESFORCE_API_VERSION") {
        config.agent.api_version = version;
    }

    if let Some(dir) = lookup("STATIC_DIR") {
        config.static_files.dir = PathBuf::from(dir);
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_listen_on_port_3000() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.static_files.dir, PathBuf::from("public"));
        assert_eq!(config.agent.domain, sommelier_agent::config::DEFAULT_DOMAIN);
        assert!(config.agent.credentials().is_none());
    }

    #[test]
    fn env_overrides_fill_integration_settings() {
        let mut config = Config::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "8080"),
                ("CHATGPT_API_KEY", "sk-env"),
                ("SALESFORCE_DOMAIN", "https://acme.my.salesforce.com"),
                ("SALESFORCE_CONSUMER_KEY", "key"),
                ("SALESFORCE_CONSUMER_SECRET", "secret"),
                ("SALESFORCE_AGENT_ID", "0XxAGENT"),
                ("LOG_JSON", "1"),
            ]),
        );

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.llm.api_key, "sk-env");
        assert_eq!(config.agent.domain, "https://acme.my.salesforce.com");
        assert_eq!(config.agent.agent_id, "0XxAGENT");
        assert!(config.agent.credentials().is_some());
        assert!(config.logging.json);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn file_sections_parse() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 4000

            [llm]
            chat_model = "gpt-4o"

            [agent]
            domain = "https://acme.my.salesforce.com"
            client_id = "file-key"

            [static_files]
            dir = "/srv/sommelier"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.llm.chat_model, "gpt-4o");
        assert_eq!(config.llm.max_tokens, 300);
        assert_eq!(config.agent.client_id, "file-key");
        assert_eq!(config.static_files.dir, PathBuf::from("/srv/sommelier"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        assert!(load_config(Some("/nonexistent/sommelier.toml")).is_ok());
    }
}
