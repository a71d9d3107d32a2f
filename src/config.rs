//! Server configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags or their environment variables.

use crate::strategy::ProviderDefaults;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";

/// Default seed file location.
pub const DEFAULT_SEED_FILE: &str = "data/seed/functions.json";

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ServerConfig`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying decode failure.
        source: toml::de::Error,
    },

    /// The listen address does not parse as a socket address.
    #[error("invalid listen address '{0}'")]
    ListenAddr(String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Credentials and endpoints applied when a function configuration omits
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Anthropic API key.
    pub anthropic_api_key: Option<String>,
    /// Perplexity API key.
    pub perplexity_api_key: Option<String>,
    /// Ollama host URL.
    pub ollama_host: Option<String>,
}

impl ProviderSettings {
    /// Builds strategy defaults from these settings.
    #[must_use]
    pub fn to_defaults(&self) -> ProviderDefaults {
        let mut defaults = ProviderDefaults::new();
        if let Some(key) = &self.anthropic_api_key {
            defaults = defaults.with_anthropic_api_key(key.clone());
        }
        if let Some(key) = &self.perplexity_api_key {
            defaults = defaults.with_perplexity_api_key(key.clone());
        }
        if let Some(host) = &self.ollama_host {
            defaults = defaults.with_ollama_host(host.clone());
        }
        defaults
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address.
    pub listen_addr: String,
    /// `PostgreSQL` URL of the registry; the in-memory registry is used when
    /// absent.
    pub database_url: Option<String>,
    /// JSON file loaded into an empty registry at startup.
    pub seed_file: PathBuf,
    /// Log output format.
    pub log_format: LogFormat,
    /// Provider defaults.
    pub providers: ProviderSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_owned(),
            database_url: None,
            seed_file: PathBuf::from(DEFAULT_SEED_FILE),
            log_format: LogFormat::default(),
            providers: ProviderSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text does not decode.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads configuration from `path`, or the defaults when no file is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or decoded.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(file) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_toml(file, &text)
    }

    /// Loads the file named by `args` and applies its overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or decoded.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let mut config = Self::load(args.config.as_deref())?;
        config.apply(args);
        Ok(config)
    }

    /// Overrides file settings with every flag that was given.
    pub fn apply(&mut self, args: Args) {
        if let Some(addr) = args.listen_addr {
            self.listen_addr = addr;
        }
        if args.database_url.is_some() {
            self.database_url = args.database_url;
        }
        if let Some(seed_file) = args.seed_file {
            self.seed_file = seed_file;
        }
        if let Some(format) = args.log_format {
            self.log_format = format;
        }
        if args.anthropic_api_key.is_some() {
            self.providers.anthropic_api_key = args.anthropic_api_key;
        }
        if args.perplexity_api_key.is_some() {
            self.providers.perplexity_api_key = args.perplexity_api_key;
        }
        if args.ollama_host.is_some() {
            self.providers.ollama_host = args.ollama_host;
        }
    }

    /// Returns the parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ListenAddr`] when the address is malformed.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::ListenAddr(self.listen_addr.clone()))
    }
}

/// Command-line flags; each falls back to its environment variable.
#[derive(Debug, Clone, Default, Parser)]
#[command(author, version, about = "Configuration-driven AI function server")]
pub struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "AI_FACTORY_CONFIG")]
    pub config: Option<PathBuf>,

    /// HTTP listen address.
    #[arg(long, env = "AI_FACTORY_LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// `PostgreSQL` URL of the function registry.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Seed file loaded into an empty registry.
    #[arg(long, env = "AI_FACTORY_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, env = "AI_FACTORY_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Default Anthropic API key.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// Default Perplexity API key.
    #[arg(long, env = "PERPLEXITY_API_KEY", hide_env_values = true)]
    pub perplexity_api_key: Option<String>,

    /// Ollama host URL.
    #[arg(long, env = "OLLAMA_HOST")]
    pub ollama_host: Option<String>,
}
