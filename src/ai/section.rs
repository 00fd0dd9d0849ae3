//! AI Architecture Section
//!
//! Asks the collaborator for an architecture diagram and turns every
//! failure mode (absent provider, error, timeout, empty reply) into an
//! empty fragment. Nothing here can fail the run.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, info, warn};

use super::prompt::ArchitecturePrompt;
use super::provider::{LlmResponse, SharedProvider};
use super::timeout::{TimeoutConfig, with_timeout};
use crate::config::LlmConfig;
use crate::constants::network::{RETRY_MAX_DELAY_MS, RETRY_MIN_DELAY_MS};
use crate::diagram::MermaidValidator;
use crate::types::{ArchError, DiagramFragment, ProjectModel, Result};

const SECTION_NAME: &str = "AI-generated architecture";

/// Renders the AI-generated architecture fragment
pub struct AiSection {
    provider: Option<SharedProvider>,
    timeouts: TimeoutConfig,
    max_retries: usize,
    min_delay: Duration,
}

impl AiSection {
    pub fn new(provider: Option<SharedProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            timeouts: TimeoutConfig::from_config(config),
            max_retries: config.max_retries,
            min_delay: Duration::from_millis(RETRY_MIN_DELAY_MS),
        }
    }

    /// Section without a collaborator; always renders empty
    pub fn disabled() -> Self {
        Self::new(None, &LlmConfig::default())
    }

    /// Override the first backoff delay
    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate the fragment. Failures are logged and yield an empty fragment.
    pub async fn render(&self, model: &ProjectModel) -> DiagramFragment {
        let Some(provider) = &self.provider else {
            debug!("No collaborator configured; AI section left empty");
            return DiagramFragment::empty();
        };

        let prompt = ArchitecturePrompt::for_model(model);
        let attempt = with_timeout(
            self.timeouts.section,
            self.generate_with_retry(provider, &prompt),
            SECTION_NAME,
        )
        .await;

        match attempt {
            Ok(response) => {
                info!(
                    "{} received from {} ({} tokens, {}ms)",
                    SECTION_NAME,
                    response.metadata.provider,
                    response.usage.total(),
                    response.timing.total_ms
                );
                let fragment = DiagramFragment::raw(response.content);
                if fragment.is_empty() {
                    warn!("{}: collaborator returned no content", SECTION_NAME);
                    return DiagramFragment::empty();
                }
                MermaidValidator::check_and_log(SECTION_NAME, &fragment);
                fragment
            }
            Err(e) => {
                warn!("{} skipped: {}", SECTION_NAME, e);
                DiagramFragment::empty()
            }
        }
    }

    async fn generate_with_retry(
        &self,
        provider: &SharedProvider,
        prompt: &ArchitecturePrompt,
    ) -> Result<LlmResponse> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(Duration::from_millis(RETRY_MAX_DELAY_MS))
            .with_max_times(self.max_retries)
            .with_jitter();

        (|| provider.generate(&prompt.system, &prompt.user))
            .retry(backoff)
            .when(ArchError::is_recoverable)
            .notify(|err: &ArchError, delay: Duration| {
                warn!(
                    "{} request to {} failed, retrying in {:?}: {}",
                    SECTION_NAME,
                    provider.name(),
                    delay,
                    err
                );
            })
            .await
    }
}
