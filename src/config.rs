//! Configuration for the weather feed client

use serde::{Deserialize, Serialize};

use crate::error::WxBriefError;
use crate::Result;

fn default_base_url() -> String {
    "https://aviationweather.gov/api/data".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("wxbrief/{}", env!("CARGO_PKG_VERSION"))
}

/// Feed client configuration. Defaults are usable as-is; environment
/// variables override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WxBriefConfig {
    /// Base URL of the weather data API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WxBriefConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl WxBriefConfig {
    /// Defaults with `WXBRIEF_BASE_URL` / `WXBRIEF_TIMEOUT_SECONDS`
    /// environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("WXBRIEF_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("WXBRIEF_TIMEOUT_SECONDS") {
            config.timeout_seconds = timeout.parse().map_err(|_| {
                WxBriefError::config(format!("invalid WXBRIEF_TIMEOUT_SECONDS: {timeout}"))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(WxBriefError::config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(WxBriefError::config(
                "timeout_seconds must be between 1 and 300",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WxBriefConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, "https://aviationweather.gov/api/data");
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.user_agent.starts_with("wxbrief/"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = WxBriefConfig::default();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config.timeout_seconds = 30;
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
