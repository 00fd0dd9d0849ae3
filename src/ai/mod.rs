//! AI Integration Layer
//!
//! Optional text-generation collaborator used for the AI-generated
//! architecture section. Every failure here degrades to an empty fragment.

pub mod prompt;
pub mod provider;
pub mod section;
pub mod timeout;

pub use prompt::{ARCHITECT_SYSTEM_PROMPT, ArchitecturePrompt, structural_summary};
pub use provider::{
    LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig, ResponseMetadata, ResponseTiming,
    SharedProvider, TokenUsage, create_provider,
};
pub use section::AiSection;
pub use timeout::{TimeoutConfig, with_timeout};

use tracing::{debug, warn};

use crate::config::LlmConfig;

/// Build the configured collaborator, if any.
///
/// A disabled or unusable configuration yields `None`; the report is
/// then assembled with an empty AI section.
pub fn resolve_provider(config: &LlmConfig) -> Option<SharedProvider> {
    if !config.enabled {
        debug!("AI section disabled by configuration");
        return None;
    }

    match create_provider(&ProviderConfig::from(config)) {
        Ok(provider) => {
            debug!(
                "Using {} collaborator (model: {})",
                provider.name(),
                provider.model()
            );
            Some(provider)
        }
        Err(e) => {
            warn!("AI section unavailable: {}", e);
            None
        }
    }
}
