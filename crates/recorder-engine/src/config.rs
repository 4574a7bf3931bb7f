//! Engine configuration.

use std::time::Duration;

/// Default deadline for the part of a mutation that runs before its
/// active record commits.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Tunables for a [`VersioningEngine`](crate::VersioningEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deadline for one mutation attempt, up to its active record swap.
    /// `None` disables it.
    pub operation_timeout: Option<Duration>,
    /// How many times a mutation that lost the active-record swap is
    /// retried from scratch before `ConcurrencyConflict` is returned.
    pub conflict_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            operation_timeout: Some(DEFAULT_OPERATION_TIMEOUT),
            conflict_retries: 0,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `RECORDER_OPERATION_TIMEOUT_MS` - Optional, defaults to 5000; 0 disables
    /// - `RECORDER_CONFLICT_RETRIES` - Optional, defaults to 0
    pub fn from_env() -> Self {
        let operation_timeout = match std::env::var("RECORDER_OPERATION_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => Some(DEFAULT_OPERATION_TIMEOUT),
        };

        let conflict_retries = std::env::var("RECORDER_CONFLICT_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        Self {
            operation_timeout,
            conflict_retries,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.conflict_retries = retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.operation_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.conflict_retries, 0);
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_timeout(None)
            .with_conflict_retries(3);
        assert_eq!(config.operation_timeout, None);
        assert_eq!(config.conflict_retries, 3);
    }
}
