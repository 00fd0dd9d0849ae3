//! Timeout Configuration
//!
//! Bound on the whole AI section, plus a helper that turns an elapsed
//! deadline into [`ArchError::Timeout`]. Single HTTP requests are bounded
//! by the provider's HTTP client (`llm.timeout_secs`).
//!
//! ## Usage
//!
//! ```ignore
//! use crate::ai::timeout::{TimeoutConfig, with_timeout};
//!
//! let timeouts = TimeoutConfig::from_config(&config.llm);
//! let response = with_timeout(
//!     timeouts.section,
//!     async { provider.generate(system, prompt).await },
//!     "AI architecture section",
//! )
//! .await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::constants::network as net_constants;
use crate::types::{ArchError, Result};

#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Whole AI section, retries included (default: 5 minutes)
    pub section: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            section: Duration::from_secs(net_constants::DEFAULT_SECTION_TIMEOUT_SECS),
        }
    }
}

impl TimeoutConfig {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            section: Duration::from_secs(config.section_timeout_secs),
        }
    }
}

/// Execute an async operation with a timeout
///
/// Returns [`ArchError::Timeout`] if the operation doesn't complete within
/// the specified duration.
pub async fn with_timeout<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(ArchError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_config_defaults() {
        let config = TimeoutConfig::default();
        assert_eq!(config.section.as_secs(), 300);
    }

    #[test]
    fn test_from_llm_config() {
        let llm = LlmConfig {
            section_timeout_secs: 45,
            ..Default::default()
        };
        let config = TimeoutConfig::from_config(&llm);
        assert_eq!(config.section, Duration::from_secs(45));
    }

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout(
            Duration::from_secs(1),
            async { Ok::<_, ArchError>(42) },
            "test operation",
        )
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok::<_, ArchError>(42)
            },
            "slow operation",
        )
        .await;
        match result {
            Err(ArchError::Timeout { operation, .. }) => assert_eq!(operation, "slow operation"),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
