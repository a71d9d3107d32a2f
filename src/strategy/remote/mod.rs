//! Remote text-generation strategy shared by the three providers.
//!
//! Each call resolves a credential, expands the prompt template, and builds
//! a [`GenerationRequest`] carrying its own endpoint and credential before
//! handing it to the provider's [`TextGenerationClient`].

mod anthropic;
mod ollama;
mod perplexity;

pub use anthropic::AnthropicClient;
pub use ollama::OllamaClient;
pub use perplexity::PerplexityClient;

use super::{
    GenerationReply, GenerationRequest, StrategyError, StrategyResult, TextGenerationClient,
};
use crate::dispatch::{log_preview, template};
use crate::function::domain::{GenerationConfig, Provider};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::debug;

/// Anthropic API base URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com";
/// Perplexity API base URL.
pub const DEFAULT_PERPLEXITY_URL: &str = "https://api.perplexity.ai";
/// Ollama host used when neither configuration nor environment names one.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

const NO_TEXT_CONTENT: &str = "No text content in response";

/// Process-wide provider settings, loaded once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDefaults {
    anthropic_api_key: Option<String>,
    perplexity_api_key: Option<String>,
    ollama_host: Option<String>,
}

impl ProviderDefaults {
    /// Creates defaults with no credentials and the stock endpoints.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            anthropic_api_key: None,
            perplexity_api_key: None,
            ollama_host: None,
        }
    }

    /// Sets the fallback Anthropic credential.
    #[must_use]
    pub fn with_anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = Some(key.into());
        self
    }

    /// Sets the fallback Perplexity credential.
    #[must_use]
    pub fn with_perplexity_api_key(mut self, key: impl Into<String>) -> Self {
        self.perplexity_api_key = Some(key.into());
        self
    }

    /// Sets the default Ollama host.
    #[must_use]
    pub fn with_ollama_host(mut self, host: impl Into<String>) -> Self {
        self.ollama_host = Some(host.into());
        self
    }

    /// Returns the fallback credential for a provider.
    #[must_use]
    pub fn credential(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
            Provider::Perplexity => self.perplexity_api_key.as_deref(),
            Provider::Ollama => None,
        };
        key.filter(|value| !value.is_empty())
    }

    /// Returns the default endpoint for a provider.
    #[must_use]
    pub fn endpoint(&self, provider: Provider) -> &str {
        match provider {
            Provider::Anthropic => DEFAULT_ANTHROPIC_URL,
            Provider::Perplexity => DEFAULT_PERPLEXITY_URL,
            Provider::Ollama => self.ollama_host.as_deref().unwrap_or(DEFAULT_OLLAMA_HOST),
        }
    }
}

/// Per-provider request defaults.
struct ProviderProfile {
    model: &'static str,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    top_p: Option<f64>,
}

impl ProviderProfile {
    const fn of(provider: Provider) -> Self {
        match provider {
            Provider::Anthropic => Self {
                model: "claude-3-5-sonnet-20240620",
                temperature: None,
                max_tokens: Some(1000),
                top_p: None,
            },
            Provider::Perplexity => Self {
                model: "sonar-small-online",
                temperature: None,
                max_tokens: None,
                top_p: None,
            },
            Provider::Ollama => Self {
                model: "llama3",
                temperature: Some(0.7),
                max_tokens: Some(1024),
                top_p: Some(0.9),
            },
        }
    }
}

/// One client per provider.
#[derive(Clone)]
pub struct ProviderClients {
    anthropic: Arc<dyn TextGenerationClient>,
    perplexity: Arc<dyn TextGenerationClient>,
    ollama: Arc<dyn TextGenerationClient>,
}

impl ProviderClients {
    /// Creates a client set from explicit implementations.
    #[must_use]
    pub fn new(
        anthropic: Arc<dyn TextGenerationClient>,
        perplexity: Arc<dyn TextGenerationClient>,
        ollama: Arc<dyn TextGenerationClient>,
    ) -> Self {
        Self {
            anthropic,
            perplexity,
            ollama,
        }
    }

    /// Creates the HTTP clients for the real provider APIs.
    #[must_use]
    pub fn http() -> Self {
        Self::new(
            Arc::new(AnthropicClient),
            Arc::new(PerplexityClient),
            Arc::new(OllamaClient),
        )
    }

    fn get(&self, provider: Provider) -> &dyn TextGenerationClient {
        match provider {
            Provider::Anthropic => self.anthropic.as_ref(),
            Provider::Perplexity => self.perplexity.as_ref(),
            Provider::Ollama => self.ollama.as_ref(),
        }
    }
}

/// Strategy that turns a function call into one provider round trip.
#[derive(Clone)]
pub struct RemoteGenerationStrategy {
    clients: ProviderClients,
    defaults: ProviderDefaults,
}

impl RemoteGenerationStrategy {
    /// Creates a strategy over the given clients and startup defaults.
    #[must_use]
    pub const fn new(clients: ProviderClients, defaults: ProviderDefaults) -> Self {
        Self { clients, defaults }
    }

    /// Calls `provider` with the expanded prompt.
    ///
    /// When tools are declared and the reply carries a tool invocation, its
    /// argument object is returned as-is. Otherwise the reply is wrapped as
    /// `{"text": ...}`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::CredentialMissing`] when no credential is
    /// available, [`StrategyError::Template`] when the prompt cannot be
    /// expanded, and [`StrategyError::Provider`] when the call fails.
    pub async fn call(
        &self,
        provider: Provider,
        config: &GenerationConfig,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Value> {
        let credential = self.resolve_credential(provider, config, inputs)?;
        let prompt = template::format(&config.prompt_template, inputs)?;
        let request = self.build_request(provider, config, credential, prompt);

        debug!(
            provider = %provider,
            model = %request.model,
            tools = request.tools.len(),
            prompt = log_preview(&request.prompt),
            "calling text-generation provider"
        );
        let reply = self.clients.get(provider).generate(&request).await?;
        Ok(shape_reply(provider, &request, reply))
    }

    fn resolve_credential(
        &self,
        provider: Provider,
        config: &GenerationConfig,
        inputs: &Map<String, Value>,
    ) -> StrategyResult<Option<String>> {
        if !provider.requires_credential() {
            return Ok(None);
        }

        let supplied = inputs
            .get("api_key")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty());
        let stored = config.api_key.as_deref().filter(|key| !key.is_empty());

        supplied
            .or(stored)
            .or_else(|| self.defaults.credential(provider))
            .map(|key| Some(key.to_owned()))
            .ok_or(StrategyError::CredentialMissing { provider })
    }

    fn build_request(
        &self,
        provider: Provider,
        config: &GenerationConfig,
        credential: Option<String>,
        prompt: String,
    ) -> GenerationRequest {
        let profile = ProviderProfile::of(provider);
        GenerationRequest {
            endpoint: config
                .base_url
                .clone()
                .unwrap_or_else(|| self.defaults.endpoint(provider).to_owned()),
            credential,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| profile.model.to_owned()),
            system_prompt: config
                .system_prompt
                .clone()
                .filter(|system| !system.is_empty()),
            prompt,
            temperature: config.temperature.or(profile.temperature),
            max_tokens: config.max_tokens.or(profile.max_tokens),
            top_p: config.top_p.or(profile.top_p),
            tools: config.tools().to_vec(),
        }
    }
}

fn shape_reply(provider: Provider, request: &GenerationRequest, reply: GenerationReply) -> Value {
    let GenerationReply {
        text,
        tool_arguments,
    } = reply;

    if !request.tools.is_empty()
        && let Some(arguments) = tool_arguments
    {
        return arguments;
    }

    let fallback = match provider {
        Provider::Anthropic => NO_TEXT_CONTENT,
        Provider::Perplexity | Provider::Ollama => "",
    };
    json!({ "text": text.unwrap_or_else(|| fallback.to_owned()) })
}

/// Normalizes tool arguments that arrive as JSON text.
fn parse_tool_arguments(provider: Provider, raw: Value) -> StrategyResult<Value> {
    match raw {
        Value::String(text) => serde_json::from_str(&text).map_err(|err| {
            StrategyError::provider(provider, format!("invalid tool arguments: {err}"))
        }),
        other => Ok(other),
    }
}

/// One message of a chat-style request body.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Builds the optional system message followed by the user prompt.
fn chat_messages(request: &GenerationRequest) -> Vec<ChatMessage<'_>> {
    let system = request.system_prompt.as_deref().map(|content| ChatMessage {
        role: "system",
        content,
    });
    system
        .into_iter()
        .chain(std::iter::once(ChatMessage {
            role: "user",
            content: &request.prompt,
        }))
        .collect()
}

fn http_client(provider: Provider) -> StrategyResult<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|err| StrategyError::provider(provider, err))
}

fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}

async fn send_json<T: DeserializeOwned>(
    provider: Provider,
    request: reqwest::RequestBuilder,
) -> StrategyResult<T> {
    let response = request
        .send()
        .await
        .map_err(|err| StrategyError::provider(provider, err))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StrategyError::provider(
            provider,
            format!("HTTP {status}: {body}"),
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|err| StrategyError::provider(provider, err))
}
