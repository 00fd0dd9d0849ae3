//! Chat Completions Provider
//!
//! One provider for both the OpenAI Chat Completions API and Azure OpenAI
//! deployments. The wire format is shared; only the URL layout and the
//! authentication header differ.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use super::{
    LlmProvider, LlmResponse, ProviderConfig, ResponseMetadata, ResponseTiming, TokenUsage,
};
use crate::config::ProviderKind;
use crate::constants::llm as llm_constants;
use crate::types::{ArchError, CollaboratorError, ErrorCategory, ErrorClassifier, Result};

/// Chat-completions provider with secure API key handling
pub struct OpenAiProvider {
    kind: ProviderKind,
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    endpoint: Url,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("kind", &self.kind)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiProvider {
    /// Build a provider from fully resolved settings.
    ///
    /// See [`ProviderConfig::with_env_fallback`] for resolving unset values.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let kind = config.kind;

        let api_key = config.api_key.ok_or_else(|| {
            ArchError::Config(match kind {
                ProviderKind::AzureOpenai => {
                    "Azure OpenAI API key not found. Set AZURE_OPENAI_API_KEY or llm.api_key"
                        .to_string()
                }
                ProviderKind::Openai => {
                    "OpenAI API key not found. Set OPENAI_API_KEY or llm.api_key".to_string()
                }
            })
        })?;

        let api_base = match (kind, config.api_base) {
            (_, Some(base)) => base,
            (ProviderKind::Openai, None) => llm_constants::OPENAI_API_BASE.to_string(),
            (ProviderKind::AzureOpenai, None) => {
                return Err(ArchError::Config(
                    "Azure OpenAI endpoint not found. Set AZURE_OPENAI_ENDPOINT or llm.api_base"
                        .to_string(),
                ));
            }
        };

        let model = config.model.unwrap_or_else(|| match kind {
            ProviderKind::AzureOpenai => llm_constants::AZURE_DEFAULT_DEPLOYMENT.to_string(),
            ProviderKind::Openai => llm_constants::OPENAI_DEFAULT_MODEL.to_string(),
        });
        let api_version = config
            .api_version
            .unwrap_or_else(|| llm_constants::AZURE_DEFAULT_API_VERSION.to_string());

        let endpoint = chat_completions_url(kind, &api_base, &model, &api_version)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ArchError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            kind,
            api_key: SecretString::from(api_key),
            endpoint,
            model,
            temperature: config.temperature,
            client,
        })
    }

    fn build_request(&self, system: &str, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
        }
    }

    fn error(&self, category: ErrorCategory, message: impl Into<String>) -> ArchError {
        CollaboratorError::with_provider(category, message, self.name()).into()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate(&self, system: &str, prompt: &str) -> Result<LlmResponse> {
        info!(
            "Generating with {} (model: {}, temperature: {})",
            self.kind, self.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system, prompt);

        let builder = self.client.post(self.endpoint.clone());
        let builder = match self.kind {
            ProviderKind::AzureOpenai => builder.header("api-key", self.api_key.expose_secret()),
            ProviderKind::Openai => builder.bearer_auth(self.api_key.expose_secret()),
        };

        debug!("Sending chat completion request to {}", self.endpoint.host_str().unwrap_or(""));

        let response = builder
            .json(&request)
            .send()
            .await
            .map_err(|e| ArchError::from(ErrorClassifier::classify_transport(&e, self.name())))?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("API error ({}): {}", status, body),
                self.name(),
            )
            .into());
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            self.error(
                ErrorCategory::Unknown,
                format!("Failed to parse chat completion response: {}", e),
            )
        })?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let choice = response_body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.error(ErrorCategory::Unknown, "No choices in response"))?;
        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received {} chars in {}ms ({} tokens)",
            content.len(),
            elapsed.as_millis(),
            usage.total()
        );

        Ok(LlmResponse {
            content,
            usage,
            timing: ResponseTiming::from_duration(elapsed),
            metadata: ResponseMetadata {
                model: self.model.clone(),
                provider: self.name().to_string(),
            },
        })
    }

    fn name(&self) -> &str {
        match self.kind {
            ProviderKind::AzureOpenai => "azure-openai",
            ProviderKind::Openai => "openai",
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Chat completions URL for a provider.
///
/// - OpenAI: `{base}/chat/completions`
/// - Azure: `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}`
pub fn chat_completions_url(
    kind: ProviderKind,
    api_base: &str,
    model: &str,
    api_version: &str,
) -> Result<Url> {
    let mut url = Url::parse(api_base.trim())
        .map_err(|e| ArchError::Config(format!("Invalid API base URL '{}': {}", api_base, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ArchError::Config(format!(
            "API base URL must use http or https: {}",
            api_base
        )));
    }

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ArchError::Config(format!("API base URL cannot have a path: {}", api_base))
        })?;
        segments.pop_if_empty();
        match kind {
            ProviderKind::AzureOpenai => {
                segments.extend(["openai", "deployments", model, "chat", "completions"]);
            }
            ProviderKind::Openai => {
                segments.extend(["chat", "completions"]);
            }
        }
    }

    if kind == ProviderKind::AzureOpenai {
        url.query_pairs_mut().append_pair("api-version", api_version);
    }

    Ok(url)
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            kind,
            model: Some("gpt-4.1-mini".to_string()),
            api_base: Some("https://example.openai.azure.com/".to_string()),
            api_version: Some("2025-01-01-preview".to_string()),
            api_key: Some("secret-key".to_string()),
            timeout_secs: 5,
            temperature: 0.0,
        }
    }

    #[test]
    fn test_azure_url() {
        let url = chat_completions_url(
            ProviderKind::AzureOpenai,
            "https://example.openai.azure.com/",
            "gpt-4.1-mini",
            "2025-01-01-preview",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.openai.azure.com/openai/deployments/gpt-4.1-mini/chat/completions?api-version=2025-01-01-preview"
        );
    }

    #[test]
    fn test_openai_url() {
        let url = chat_completions_url(
            ProviderKind::Openai,
            "https://api.openai.com/v1",
            "gpt-4.1-mini",
            "",
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            chat_completions_url(ProviderKind::Openai, "not a url", "m", ""),
            Err(ArchError::Config(_))
        ));
        assert!(matches!(
            chat_completions_url(ProviderKind::Openai, "ftp://host/v1", "m", ""),
            Err(ArchError::Config(_))
        ));
    }

    #[test]
    fn test_new_requires_key() {
        let mut missing = config(ProviderKind::AzureOpenai);
        missing.api_key = None;
        assert!(matches!(
            OpenAiProvider::new(missing),
            Err(ArchError::Config(_))
        ));
    }

    #[test]
    fn test_azure_requires_endpoint() {
        let mut missing = config(ProviderKind::AzureOpenai);
        missing.api_base = None;
        assert!(matches!(
            OpenAiProvider::new(missing),
            Err(ArchError::Config(_))
        ));
    }

    #[test]
    fn test_provider_identity_and_redaction() {
        let provider = OpenAiProvider::new(config(ProviderKind::AzureOpenai)).unwrap();
        assert_eq!(provider.name(), "azure-openai");
        assert_eq!(provider.model(), "gpt-4.1-mini");

        let debug = format!("{:?}", provider);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_shape() {
        let provider = OpenAiProvider::new(config(ProviderKind::Openai)).unwrap();
        let request = provider.build_request("system text", "user text");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4.1-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "system text");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "user text");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "graph TD\n  A --> B"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("graph TD\n  A --> B")
        );
        assert_eq!(parsed.usage.unwrap().prompt_tokens, 12);

        let null_content = r#"{"choices": [{"message": {"content": null}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(null_content).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
