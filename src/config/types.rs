//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global and project (.archweave/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::network;
use crate::types::{ArchError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Tree walking and parsing settings
    pub analysis: AnalysisConfig,

    /// Text-generation collaborator settings
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.extension.is_empty() || self.analysis.extension.starts_with('.') {
            return Err(ArchError::Config(format!(
                "analysis.extension must be a bare extension like \"py\", got \"{}\"",
                self.analysis.extension
            )));
        }

        if self.analysis.max_file_size == Some(0) {
            return Err(ArchError::Config(
                "analysis.max_file_size must be greater than 0".to_string(),
            ));
        }

        for pattern in &self.analysis.exclude {
            glob::Pattern::new(pattern).map_err(|e| {
                ArchError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ArchError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 || self.llm.section_timeout_secs == 0 {
            return Err(ArchError::Config(
                "LLM timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Source file extension, without the dot
    pub extension: String,

    /// Extra directory names to skip (hidden and generated dirs are always skipped)
    pub exclude_dirs: Vec<String>,

    /// Glob patterns over relative paths to exclude
    pub exclude: Vec<String>,

    /// Maximum file size in bytes; larger files are recorded as skipped. No limit when unset.
    pub max_file_size: Option<u64>,

    /// Honor .gitignore files while walking
    pub respect_gitignore: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            exclude_dirs: Vec::new(),
            exclude: Vec::new(),
            max_file_size: None,
            respect_gitignore: false,
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Chat-completions flavour used for the AI section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    #[default]
    AzureOpenai,
    Openai,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::AzureOpenai => write!(f, "azure-openai"),
            ProviderKind::Openai => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "azure-openai" | "azure" => Ok(ProviderKind::AzureOpenai),
            "openai" => Ok(ProviderKind::Openai),
            _ => Err(format!(
                "Unknown provider: {}. Valid values: azure-openai, openai",
                s
            )),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Generate the AI section at all
    pub enabled: bool,

    pub provider: ProviderKind,

    /// Model (OpenAI) or deployment name (Azure)
    pub model: Option<String>,

    /// API base URL or Azure resource endpoint
    pub api_base: Option<String>,

    /// Azure API version query parameter
    pub api_version: Option<String>,

    /// API key, never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Upper bound for the whole AI section in seconds, retries included
    pub section_timeout_secs: u64,

    /// Retries for recoverable failures
    pub max_retries: usize,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("section_timeout_secs", &self.section_timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ProviderKind::AzureOpenai,
            model: None,
            api_base: None,
            api_version: None,
            api_key: None,
            temperature: 0.0,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            section_timeout_secs: network::DEFAULT_SECTION_TIMEOUT_SECS,
            max_retries: network::DEFAULT_MAX_RETRIES,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
