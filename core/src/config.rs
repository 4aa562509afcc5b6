//! Construction-time configuration for `Client`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings consumed by `Client::new`. Not retained after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prefix every request path is appended to. Must not be empty.
    pub base_url: String,

    /// Upper bound on a whole request/response exchange. Zero means no
    /// timeout.
    #[serde(default)]
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::ZERO,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `None` when the timeout is zero, i.e. requests may block indefinitely.
    pub fn effective_timeout(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }

    /// Reject configurations a client cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::InvalidConfig("base_url cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_no_timeout() {
        let config = ClientConfig::new("http://api.test");
        assert_eq!(config.timeout, Duration::ZERO);
        assert_eq!(config.effective_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn with_timeout_sets_bound() {
        let config = ClientConfig::new("http://api.test").with_timeout(Duration::from_secs(5));
        assert_eq!(config.effective_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = ClientConfig::new("").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn timeout_defaults_when_missing_from_json() {
        let config: ClientConfig = serde_json::from_str(r#"{"base_url":"http://api.test"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("http://api.test"));
    }

    #[test]
    fn timeout_deserializes_from_secs_and_nanos() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url":"http://api.test","timeout":{"secs":2,"nanos":500000000}}"#,
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }
}
