//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait the AI section talks to. Providers return
//! the raw generated text together with usage and timing metrics.

mod openai;

pub use openai::{OpenAiProvider, chat_completions_url};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{LlmConfig, ProviderKind};
use crate::constants::llm::{self as llm_constants, env as llm_env};
use crate::types::Result;

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Generated text plus usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Generated text, possibly empty
    pub content: String,
    pub usage: TokenUsage,
    pub timing: ResponseTiming,
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with content only (usage unknown)
    pub fn content_only(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model or deployment used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider type
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Connection settings handed to a provider at construction.
///
/// API keys are never serialized and are redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Model (OpenAI) or deployment (Azure)
    pub model: Option<String>,
    /// API base URL or Azure resource endpoint
    pub api_base: Option<String>,
    /// Azure `api-version` query parameter
    pub api_version: Option<String>,
    /// Never serialized to output for security
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            kind: config.provider,
            model: config.model.clone(),
            api_base: config.api_base.clone(),
            api_version: config.api_version.clone(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
        }
    }
}

impl ProviderConfig {
    /// Fill unset fields from the provider's conventional environment
    /// variables, then from built-in defaults.
    ///
    /// `lookup` is the environment accessor (`std::env::var` in production).
    pub fn with_env_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        match self.kind {
            ProviderKind::AzureOpenai => {
                self.api_key = self.api_key.or_else(|| env_value(llm_env::AZURE_API_KEY));
                self.api_base = self.api_base.or_else(|| env_value(llm_env::AZURE_ENDPOINT));
                self.api_version = self
                    .api_version
                    .or_else(|| env_value(llm_env::AZURE_API_VERSION))
                    .or_else(|| Some(llm_constants::AZURE_DEFAULT_API_VERSION.to_string()));
                self.model = self
                    .model
                    .or_else(|| env_value(llm_env::AZURE_DEPLOYMENT))
                    .or_else(|| Some(llm_constants::AZURE_DEFAULT_DEPLOYMENT.to_string()));
            }
            ProviderKind::Openai => {
                self.api_key = self.api_key.or_else(|| env_value(llm_env::OPENAI_API_KEY));
                self.api_base = self
                    .api_base
                    .or_else(|| Some(llm_constants::OPENAI_API_BASE.to_string()));
                self.model = self
                    .model
                    .or_else(|| Some(llm_constants::OPENAI_DEFAULT_MODEL.to_string()));
            }
        }
        self
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Chat-style text generation
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate text for a system instruction and a user prompt
    async fn generate(&self, system: &str, prompt: &str) -> Result<LlmResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared provider, resolving unset values from the process environment
pub fn create_provider(config: &ProviderConfig) -> Result<SharedProvider> {
    let resolved = config
        .clone()
        .with_env_fallback(|key| std::env::var(key).ok());
    Ok(Arc::new(OpenAiProvider::new(resolved)?))
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

    fn config(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig::from(&LlmConfig {
            provider: kind,
            ..Default::default()
        })
    }

    #[test]
    fn test_azure_env_fallback() {
        let resolved = config(ProviderKind::AzureOpenai).with_env_fallback(env(&[
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_ENDPOINT", "https://example.openai.azure.com"),
        ]));

        assert_eq!(resolved.api_key.as_deref(), Some("secret"));
        assert_eq!(
            resolved.api_base.as_deref(),
            Some("https://example.openai.azure.com")
        );
        assert_eq!(resolved.api_version.as_deref(), Some("2025-01-01-preview"));
        assert_eq!(resolved.model.as_deref(), Some("gpt-4.1-mini"));
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        let mut explicit = config(ProviderKind::AzureOpenai);
        explicit.model = Some("my-deployment".to_string());
        explicit.api_key = Some("from-config".to_string());

        let resolved = explicit.with_env_fallback(env(&[
            ("AZURE_OPENAI_API_KEY", "from-env"),
            ("AZURE_OPENAI_DEPLOYMENT", "other"),
        ]));
        assert_eq!(resolved.api_key.as_deref(), Some("from-config"));
        assert_eq!(resolved.model.as_deref(), Some("my-deployment"));
    }

    #[test]
    fn test_openai_defaults() {
        let resolved = config(ProviderKind::Openai).with_env_fallback(env(&[(
            "OPENAI_API_KEY",
            "sk-test",
        )]));
        assert_eq!(resolved.api_key.as_deref(), Some("sk-test"));
        assert_eq!(resolved.api_base.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(resolved.model.as_deref(), Some("gpt-4.1-mini"));
        assert!(resolved.api_version.is_none());
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let resolved = config(ProviderKind::AzureOpenai)
            .with_env_fallback(env(&[("AZURE_OPENAI_API_KEY", "  ")]));
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut config = config(ProviderKind::Openai);
        config.api_key = Some("sk-very-secret".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_token_usage() {
        let usage = TokenUsage::from_openai(100, 50);
        assert_eq!(usage.total(), 150);
    }
}
