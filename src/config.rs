//! Configuration support for publisher construction
//!
//! TOML-based declaration of the desired topic set and the retry policy,
//! loaded during process bootstrap:
//!
//! ```toml
//! topics = ["orders", "clicks"]
//!
//! [retry]
//! base_delay_ms = 100
//! multiplier = 2.0
//! max_delay_secs = 30
//! max_attempts = 8
//! ```

use crate::{PublishError, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Top-level publisher configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PublisherConfig {
    /// Topics this process publishes to; created during reconciliation if
    /// missing. Duplicates collapse into the set.
    pub topics: Vec<String>,

    /// Retry policy overrides
    pub retry: Option<RetryConfigToml>,
}

impl PublisherConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PublishError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PublishError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PublishError::invalid_config(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate topic names and the retry section
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.topics.iter().any(|name| name.is_empty()) {
            return Err(PublishError::invalid_config(
                "topics list contains an empty name",
            ));
        }
        if let Some(retry) = &self.retry {
            retry.validate()?;
        }
        Ok(())
    }

    /// The desired topic set for reconciliation
    pub fn desired_topics(&self) -> HashSet<String> {
        self.topics.iter().cloned().collect()
    }

    /// The retry policy, with defaults for unset fields
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfigToml::to_retry_policy)
            .unwrap_or_default()
    }
}

/// Retry policy in TOML format
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetryConfigToml {
    /// Initial retry delay in milliseconds
    pub base_delay_ms: Option<u64>,

    /// Exponential backoff multiplier
    pub multiplier: Option<f64>,

    /// Maximum retry delay in seconds
    pub max_delay_secs: Option<u64>,

    /// Maximum total attempts; unset retries indefinitely
    pub max_attempts: Option<u32>,
}

impl RetryConfigToml {
    /// Validate the backoff parameters.
    ///
    /// The multiplier must be a positive, finite number and the base delay
    /// non-zero; anything else would degenerate the exponential schedule, so
    /// it is rejected at config load rather than surfacing on the send path.
    pub fn validate(&self) -> Result<(), PublishError> {
        if let Some(multiplier) = self.multiplier {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(PublishError::invalid_config(format!(
                    "retry multiplier must be positive and finite, got {}",
                    multiplier
                )));
            }
        }
        if self.base_delay_ms == Some(0) {
            return Err(PublishError::invalid_config(
                "retry base delay must be non-zero",
            ));
        }
        Ok(())
    }

    /// Convert TOML configuration to a RetryPolicy
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(self.base_delay_ms.unwrap_or(100)),
            multiplier: self.multiplier.unwrap_or(2.0),
            max_delay: Duration::from_secs(self.max_delay_secs.unwrap_or(30)),
            max_attempts: self.max_attempts,
        }
    }
}
