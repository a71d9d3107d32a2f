//! Implementation tags and the tagged-union strategy configuration.

use super::{ImplementationDecodeError, ParseImplementationKindError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Default connection target for `database_query` functions.
pub const DEFAULT_CONNECTION_STRING: &str = "sqlite://ai_factory.db?mode=rwc";

/// Remote text-generation provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Anthropic messages API.
    Anthropic,
    /// Perplexity chat completions API.
    Perplexity,
    /// Local Ollama chat API.
    Ollama,
}

impl Provider {
    /// Returns the canonical provider tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Perplexity => "perplexity",
            Self::Ollama => "ollama",
        }
    }

    /// Returns whether calls to this provider must carry an API credential.
    #[must_use]
    pub const fn requires_credential(self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Execution strategy named by a function's `implementation_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationKind {
    /// Remote text generation through one of the providers.
    RemoteGeneration(Provider),
    /// Templated statement against a database connection.
    DatabaseQuery,
    /// Dynamically loaded WebAssembly code.
    DynamicCode,
}

impl ImplementationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RemoteGeneration(provider) => provider.as_str(),
            Self::DatabaseQuery => "database_query",
            Self::DynamicCode => "dynamic_code",
        }
    }
}

impl fmt::Display for ImplementationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ImplementationKind {
    type Error = ParseImplementationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "anthropic" => Ok(Self::RemoteGeneration(Provider::Anthropic)),
            "perplexity" => Ok(Self::RemoteGeneration(Provider::Perplexity)),
            "ollama" => Ok(Self::RemoteGeneration(Provider::Ollama)),
            "database_query" => Ok(Self::DatabaseQuery),
            "dynamic_code" => Ok(Self::DynamicCode),
            _ => Err(ParseImplementationKindError(value.to_owned())),
        }
    }
}

/// Configuration shared by the remote text-generation providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Prompt with `{key}` placeholders expanded from inputs.
    #[serde(default)]
    pub prompt_template: String,
    /// Model name; the provider default applies when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Stored credential, used when the caller supplies none.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling parameter.
    #[serde(default)]
    pub top_p: Option<f64>,
    /// Provider tool declarations, passed through verbatim.
    #[serde(default)]
    pub tools: Option<Vec<Value>>,
    /// Endpoint override; `host` is accepted for Ollama configurations.
    #[serde(default, alias = "host")]
    pub base_url: Option<String>,
}

impl GenerationConfig {
    /// Returns the declared tools, if any.
    #[must_use]
    pub fn tools(&self) -> &[Value] {
        self.tools.as_deref().unwrap_or_default()
    }
}

/// Configuration for `database_query` functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Connection URL for the target database.
    #[serde(default)]
    pub connection_string: Option<String>,
    /// Statement with `{key}` placeholders expanded from inputs.
    #[serde(default)]
    pub query_template: String,
}

impl QueryConfig {
    /// Returns the connection URL, falling back to the local store.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        self.connection_string
            .as_deref()
            .unwrap_or(DEFAULT_CONNECTION_STRING)
    }
}

/// Where a `dynamic_code` function loads its module from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSource {
    /// Module file on disk (`.wasm` or `.wat`).
    File(PathBuf),
    /// Module source text held in the configuration.
    Inline(String),
}

/// Configuration for `dynamic_code` functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeConfig {
    /// Path of a module file.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    /// Inline module source.
    #[serde(default)]
    pub code: Option<String>,
    /// Exported function to call.
    #[serde(default)]
    pub function_name: Option<String>,
}

impl CodeConfig {
    /// Returns the configured module source; a file path wins over inline code.
    #[must_use]
    pub fn source(&self) -> Option<CodeSource> {
        self.file_path.as_ref().map_or_else(
            || self.code.clone().map(CodeSource::Inline),
            |path| Some(CodeSource::File(path.clone())),
        )
    }

    /// Returns the exported function name, if configured.
    #[must_use]
    pub fn function_name(&self) -> Option<&str> {
        self.function_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Decoded implementation configuration, one variant per strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Implementation {
    /// Remote text generation.
    RemoteGeneration {
        /// Selected provider.
        provider: Provider,
        /// Provider-independent request settings.
        config: GenerationConfig,
    },
    /// Templated database statement.
    DatabaseQuery(QueryConfig),
    /// Dynamically loaded code.
    DynamicCode(CodeConfig),
}

impl Implementation {
    /// Decodes stored configuration text for the given implementation tag.
    ///
    /// The text is parsed as JSON before the tag is inspected, so malformed
    /// configuration is reported even when the tag is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ImplementationDecodeError`] when the JSON is malformed, the
    /// tag is unknown, or the payload does not fit the tag's shape.
    pub fn decode(tag: &str, config_text: &str) -> Result<Self, ImplementationDecodeError> {
        let raw: Value = serde_json::from_str(config_text)
            .map_err(|err| ImplementationDecodeError::MalformedJson(err.to_string()))?;
        let kind = ImplementationKind::try_from(tag)
            .map_err(|err| ImplementationDecodeError::UnknownKind(err.0))?;

        let invalid_shape = |err: serde_json::Error| ImplementationDecodeError::InvalidShape {
            kind: kind.as_str().to_owned(),
            reason: err.to_string(),
        };

        Ok(match kind {
            ImplementationKind::RemoteGeneration(provider) => Self::RemoteGeneration {
                provider,
                config: serde_json::from_value(raw).map_err(invalid_shape)?,
            },
            ImplementationKind::DatabaseQuery => {
                Self::DatabaseQuery(serde_json::from_value(raw).map_err(invalid_shape)?)
            }
            ImplementationKind::DynamicCode => {
                Self::DynamicCode(serde_json::from_value(raw).map_err(invalid_shape)?)
            }
        })
    }

    /// Returns the implementation kind of this configuration.
    #[must_use]
    pub const fn kind(&self) -> ImplementationKind {
        match self {
            Self::RemoteGeneration { provider, .. } => ImplementationKind::RemoteGeneration(*provider),
            Self::DatabaseQuery(_) => ImplementationKind::DatabaseQuery,
            Self::DynamicCode(_) => ImplementationKind::DynamicCode,
        }
    }
}
