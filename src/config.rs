//! Session engine configuration.
//!
//! Configuration values should be provided by the application, not
//! hardcoded in operation code.

use crate::constants::DEFAULT_BOOTSTRAP_USERNAME;
use std::time::Duration;

/// Session engine configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Username assigned to the account created by
    /// [`crate::SessionManager::bootstrap_first_admin`].
    pub bootstrap_username: String,

    /// Upper bound on each remote read during initialization.
    ///
    /// When a read exceeds this, the affected identity source is treated
    /// as unresolved (unauthenticated) and initialization still completes,
    /// so a hung provider cannot hang navigation forever. `None` disables
    /// the timeout.
    pub init_timeout: Option<Duration>,
}

impl AuthConfig {
    /// Create a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bootstrap_username: DEFAULT_BOOTSTRAP_USERNAME.to_string(),
            init_timeout: Some(Duration::from_secs(10)),
        }
    }

    /// Set the bootstrap username.
    #[must_use]
    pub fn with_bootstrap_username(mut self, username: impl Into<String>) -> Self {
        self.bootstrap_username = username.into();
        self
    }

    /// Set the initialization timeout.
    #[must_use]
    pub const fn with_init_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.init_timeout = timeout;
        self
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = AuthConfig::new()
            .with_bootstrap_username("ops")
            .with_init_timeout(Some(Duration::from_secs(2)));

        assert_eq!(config.bootstrap_username, "ops");
        assert_eq!(config.init_timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.bootstrap_username, DEFAULT_BOOTSTRAP_USERNAME);
        assert!(config.init_timeout.is_some());
    }
}
